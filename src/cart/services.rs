use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info};

use super::{
    dto::{CartItemView, UpsertItemRequest},
    repo::CartStore,
    repo_types::NewCartItem,
};
use crate::error::AppError;

pub async fn get_cart(cart: &dyn CartStore, user_id: i64) -> Result<Vec<CartItemView>, AppError> {
    let rows = cart.list(user_id).await?;
    Ok(rows.into_iter().map(CartItemView::from).collect())
}

// Column widths of `cart_items`.
const MAX_PRODUCT_ID_CHARS: usize = 50;
const MAX_NAME_CHARS: usize = 255;

/// NUMERIC(10,2) holds at most 99999999.99.
fn price_ceiling() -> Decimal {
    Decimal::new(100_000_000, 0)
}

pub(crate) fn validate_item(req: UpsertItemRequest) -> Result<NewCartItem, AppError> {
    let product_id = req.id.trim();
    let name = req.name.trim();
    if product_id.is_empty() || name.is_empty() {
        return Err(AppError::Validation("Product id and name required"));
    }
    if product_id.chars().count() > MAX_PRODUCT_ID_CHARS {
        return Err(AppError::Validation("Product id must be at most 50 characters"));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::Validation("Name must be at most 255 characters"));
    }
    // Half-cents round up, as shoppers expect.
    let price = match req.price {
        Some(p) if p >= Decimal::ZERO => p.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        _ => return Err(AppError::Validation("Price must be a non-negative number")),
    };
    if price >= price_ceiling() {
        return Err(AppError::Validation("Price must be below 100000000"));
    }
    if req.quantity < 1 {
        return Err(AppError::Validation("Quantity must be a positive integer"));
    }
    Ok(NewCartItem {
        product_id: product_id.to_string(),
        name: name.to_string(),
        price,
        quantity: req.quantity,
    })
}

/// Last write wins: quantity and price replace what was stored.
pub async fn upsert_item(
    cart: &dyn CartStore,
    user_id: i64,
    req: UpsertItemRequest,
) -> Result<(), AppError> {
    let item = validate_item(req)?;
    cart.upsert(user_id, &item).await?;
    info!(user_id, product_id = %item.product_id, quantity = item.quantity, "cart item saved");
    Ok(())
}

pub async fn remove_item(cart: &dyn CartStore, user_id: i64, product_id: &str) -> Result<(), AppError> {
    let removed = cart.remove(user_id, product_id).await?;
    debug!(user_id, %product_id, removed, "cart item removed");
    Ok(())
}

pub async fn clear_cart(cart: &dyn CartStore, user_id: i64) -> Result<(), AppError> {
    let removed = cart.clear(user_id).await?;
    debug!(user_id, removed, "cart cleared");
    Ok(())
}
