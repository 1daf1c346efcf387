use rust_decimal::Decimal;
use sqlx::FromRow;

/// Cart line item in the database.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: String, // catalog id, unique per user only
    pub name: String,       // snapshot of the product name when first added
    pub price: Decimal,     // NUMERIC(10,2) snapshot
    pub quantity: i32,
}

/// Values written by an upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}
