//! Checkout endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::{ItemId, KitId};
use domain::{CartSession, CheckoutDetails, CheckoutError, OrderSubmission};
use serde::Deserialize;
use stock_store::StockStore;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutLine {
    pub id: ItemId,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub kit_id: KitId,
    pub items: Vec<CheckoutLine>,
    #[serde(flatten)]
    pub details: CheckoutDetails,
}

/// POST /api/checkout: rebuilds the cart against live stock and places the order.
///
/// Every line goes through the cart engine, so a request breaking the kit
/// or stock caps is rejected before any stock is decremented.
#[tracing::instrument(skip(state, req), fields(kit_id = %req.kit_id, lines = req.items.len()))]
pub async fn create<S: StockStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderSubmission>), ApiError> {
    let snapshot = state.checkout.refresh_catalog(&state.catalog).await?;
    let kit = snapshot
        .kit(&req.kit_id)
        .cloned()
        .ok_or_else(|| CheckoutError::UnknownKit {
            kit_id: req.kit_id.clone(),
        })?;

    let mut session = CartSession::new();
    session.select_kit(kit);
    for line in &req.items {
        let delta = i32::try_from(line.quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| {
                ApiError::BadRequest(format!(
                    "Invalid quantity for item {}: {}",
                    line.id, line.quantity
                ))
            })?;
        session.change_quantity(&line.id, delta, &snapshot)?;
    }

    let order = state.checkout.place_order(session.cart(), req.details).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
