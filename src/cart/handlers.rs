use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CartItemView, UpsertItemRequest},
    services,
};
use crate::{
    auth::{dto::MessageResponse, extractors::AuthUser},
    error::AppError,
    state::AppState,
};

pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart).post(upsert_item).delete(clear_cart))
        .route("/cart/:product_id", delete(remove_item))
}

#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn get_cart(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<CartItemView>>, AppError> {
    let items = services::get_cart(state.cart.as_ref(), user.user_id).await?;
    Ok(Json(items))
}

#[instrument(skip(state, user, payload), fields(user_id = user.user_id))]
pub async fn upsert_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<UpsertItemRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(payload) = payload?;
    services::upsert_item(state.cart.as_ref(), user.user_id, payload).await?;
    Ok(Json(MessageResponse {
        message: "Cart updated",
    }))
}

#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn remove_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(product_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    services::remove_item(state.cart.as_ref(), user.user_id, &product_id).await?;
    Ok(Json(MessageResponse {
        message: "Item removed",
    }))
}

#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn clear_cart(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    services::clear_cart(state.cart.as_ref(), user.user_id).await?;
    Ok(Json(MessageResponse {
        message: "Cart cleared",
    }))
}
