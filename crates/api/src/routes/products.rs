//! Stock endpoints backed by the stock store.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::ItemId;
use serde::{Deserialize, Serialize};
use stock_store::{DecrementLine, StockLevels, StockRecord, StockStore, StockUpdate};

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct SetStockBatchRequest {
    pub items: Vec<StockUpdate>,
}

#[derive(Deserialize)]
pub struct SetStockRequest {
    pub stock: u32,
}

#[derive(Deserialize)]
pub struct DecrementRequest {
    pub items: Vec<DecrementLine>,
}

// -- Response types --

#[derive(Serialize)]
pub struct StockLevelsResponse {
    pub data: StockLevels,
}

#[derive(Serialize)]
pub struct UpdatedResponse {
    pub updated: usize,
}

#[derive(Serialize)]
pub struct DecrementedResponse {
    pub decremented: usize,
}

// -- Handlers --

/// GET /api/products: stock of every stored item.
#[tracing::instrument(skip(state))]
pub async fn list<S: StockStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<StockLevelsResponse>, ApiError> {
    let data = state.store.stock_levels().await?;
    Ok(Json(StockLevelsResponse { data }))
}

/// POST /api/products/stock: upserts stock for many items at once.
#[tracing::instrument(skip(state, req), fields(items = req.items.len()))]
pub async fn set_batch<S: StockStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SetStockBatchRequest>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    if req.items.iter().any(|item| item.id.as_str().trim().is_empty()) {
        return Err(ApiError::BadRequest("Item id must not be empty".to_string()));
    }

    let updated = state.store.set_stock_batch(req.items).await?;
    tracing::info!(updated, "Stock updated");
    Ok(Json(UpdatedResponse { updated }))
}

/// PUT /api/products/{id}/stock: sets the stock of one item.
#[tracing::instrument(skip(state, req))]
pub async fn set_one<S: StockStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<SetStockRequest>,
) -> Result<Json<StockRecord>, ApiError> {
    let record = state.store.set_stock(&ItemId::new(id), req.stock).await?;
    Ok(Json(record))
}

/// POST /api/products/decrement: takes every line from stock, or none.
#[tracing::instrument(skip(state, req), fields(lines = req.items.len()))]
pub async fn decrement<S: StockStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<DecrementRequest>,
) -> Result<Json<DecrementedResponse>, ApiError> {
    let decremented = req.items.len();
    state.store.decrement(req.items).await?;
    Ok(Json(DecrementedResponse { decremented }))
}
