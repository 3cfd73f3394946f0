//! Storefront catalog endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use domain::{CategoryGroup, DeliveryZones, KitDefinition, PickupPoint, default_pickup_point};
use serde::{Deserialize, Serialize};
use stock_store::StockStore;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Filters items by title or tag.
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct CatalogResponse<'a> {
    pub kits: &'a [KitDefinition],
    pub categories: Vec<CategoryGroup<'a>>,
    pub zones: &'a DeliveryZones,
    pub pickup: PickupPoint,
}

/// GET /api/catalog: kits, menu grouped by category with live stock, and delivery options.
#[tracing::instrument(skip(state))]
pub async fn get<S: StockStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let snapshot = state.checkout.refresh_catalog(&state.catalog).await?;
    let search = query.q.as_deref().unwrap_or_default();

    let response = CatalogResponse {
        kits: snapshot.kits(),
        categories: snapshot.by_category(search),
        zones: state.checkout.zones(),
        pickup: default_pickup_point(),
    };

    // Serialized here since the response borrows from the snapshot.
    let body = serde_json::to_value(&response)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize catalog: {e}")))?;
    Ok(Json(body))
}
