//! Catalog store owned by the application shell.

use std::sync::Arc;

use stock_store::StockLevels;
use tokio::sync::RwLock;

use super::CatalogSnapshot;

/// Holds the current catalog snapshot and swaps it on refresh.
///
/// Readers get an `Arc` to an immutable snapshot; a refresh replaces the
/// pointer and leaves snapshots already handed out unchanged.
#[derive(Clone)]
pub struct CatalogStore {
    current: Arc<RwLock<Arc<CatalogSnapshot>>>,
}

impl CatalogStore {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// Returns the current snapshot.
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().await.clone()
    }

    /// Merges authoritative stock into the catalog and returns the new snapshot.
    pub async fn apply_stock_levels(&self, levels: &StockLevels) -> Arc<CatalogSnapshot> {
        let mut current = self.current.write().await;
        let refreshed = Arc::new(current.with_stock_levels(levels));
        *current = refreshed.clone();
        tracing::debug!(items = levels.len(), "catalog stock refreshed");
        refreshed
    }
}
