use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    DecrementLine, ItemId, Result, StockLevels, StockRecord, StockUpdate,
    store::{StockStore, plan_decrement, record_decrement, validate_decrement},
};

/// In-memory stock store.
///
/// Backs the server when no database is configured and the test suites.
/// A decrement batch holds the write lock from the first read to the last
/// write, so overlapping batches are serialized.
#[derive(Clone, Default)]
pub struct InMemoryStockStore {
    records: Arc<RwLock<HashMap<ItemId, StockRecord>>>,
}

impl InMemoryStockStore {
    /// Creates a new empty in-memory stock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given updates.
    pub fn with_stock(updates: impl IntoIterator<Item = StockUpdate>) -> Self {
        let now = Utc::now();
        let records = updates
            .into_iter()
            .map(|update| {
                let record = StockRecord {
                    item_id: update.id.clone(),
                    title: update.title,
                    stock: update.stock,
                    last_updated: now,
                };
                (update.id, record)
            })
            .collect();

        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Returns the number of stored items.
    pub async fn item_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl StockStore for InMemoryStockStore {
    async fn stock_levels(&self) -> Result<StockLevels> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .map(|record| (record.item_id.clone(), record.stock))
            .collect())
    }

    async fn get(&self, item_id: &ItemId) -> Result<Option<StockRecord>> {
        Ok(self.records.read().await.get(item_id).cloned())
    }

    async fn set_stock_batch(&self, updates: Vec<StockUpdate>) -> Result<usize> {
        let now = Utc::now();
        let count = updates.len();
        let mut records = self.records.write().await;

        for update in updates {
            let record = records
                .entry(update.id.clone())
                .or_insert_with(|| StockRecord {
                    item_id: update.id.clone(),
                    title: None,
                    stock: 0,
                    last_updated: now,
                });
            if update.title.is_some() {
                record.title = update.title;
            }
            record.stock = update.stock;
            record.last_updated = now;
        }

        tracing::debug!(count, "stock batch stored");
        Ok(count)
    }

    async fn set_stock(&self, item_id: &ItemId, stock: u32) -> Result<StockRecord> {
        let now = Utc::now();
        let mut records = self.records.write().await;
        let record = records
            .entry(item_id.clone())
            .or_insert_with(|| StockRecord {
                item_id: item_id.clone(),
                title: None,
                stock,
                last_updated: now,
            });
        record.stock = stock;
        record.last_updated = now;
        Ok(record.clone())
    }

    #[tracing::instrument(skip(self, lines), fields(lines = lines.len()))]
    async fn decrement(&self, lines: Vec<DecrementLine>) -> Result<()> {
        let started = Instant::now();
        let outcome = self.apply_decrement(&lines).await;

        if let Err(ref err) = outcome {
            tracing::warn!(error = %err, "stock decrement rejected");
        }
        record_decrement(&outcome, started);
        outcome
    }
}

impl InMemoryStockStore {
    async fn apply_decrement(&self, lines: &[DecrementLine]) -> Result<()> {
        validate_decrement(lines)?;

        let mut records = self.records.write().await;
        let plan = plan_decrement(lines, |id| {
            records.get(id).map(|record| record.stock).unwrap_or(0)
        })?;

        let now = Utc::now();
        for (item_id, stock) in plan {
            // Unknown items plan with zero stock and fail above.
            if let Some(record) = records.get_mut(&item_id) {
                record.stock = stock;
                record.last_updated = now;
            }
        }
        Ok(())
    }
}
