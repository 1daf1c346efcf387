use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::repo_types::CartItem;

/// Cart line as the client sees it. `id` is the catalog product id.
#[derive(Debug, Serialize, PartialEq)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i32,
}

impl From<CartItem> for CartItemView {
    fn from(row: CartItem) -> Self {
        Self {
            id: row.product_id,
            name: row.name,
            price: row.price,
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpsertItemRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}
