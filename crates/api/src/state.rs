//! Shared application state.

use domain::{CatalogStore, CheckoutService, default_catalog};
use stock_store::StockStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: StockStore> {
    pub store: S,
    pub catalog: CatalogStore,
    pub checkout: CheckoutService<S>,
}

impl<S: StockStore + Clone> AppState<S> {
    /// Builds the state around `store` with the built-in catalog.
    pub fn new(store: S) -> Self {
        Self {
            checkout: CheckoutService::new(store.clone()),
            catalog: CatalogStore::new(default_catalog()),
            store,
        }
    }
}
