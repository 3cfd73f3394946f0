use std::collections::BTreeMap;
use std::time::Instant;

use async_trait::async_trait;

use crate::{DecrementLine, ItemId, Result, StockLevels, StockRecord, StockStoreError, StockUpdate};

/// Core trait for stock store implementations.
///
/// The store is the single authority on sellable units. All implementations
/// must be thread-safe (Send + Sync).
#[async_trait]
pub trait StockStore: Send + Sync {
    /// Returns the current stock of every stored item.
    async fn stock_levels(&self) -> Result<StockLevels>;

    /// Returns the record for one item, if stored.
    async fn get(&self, item_id: &ItemId) -> Result<Option<StockRecord>>;

    /// Upserts every update in one atomic step.
    ///
    /// A missing title keeps the stored title.
    async fn set_stock_batch(&self, updates: Vec<StockUpdate>) -> Result<usize>;

    /// Upserts the stock of a single item and returns the stored record.
    async fn set_stock(&self, item_id: &ItemId, stock: u32) -> Result<StockRecord>;

    /// Decrements stock for every line, all or nothing.
    ///
    /// Lines are evaluated in order against the running stock, so a repeated
    /// item sees the earlier lines' decrements. The first line asking for
    /// more than is available fails the whole batch with
    /// [`StockStoreError::InsufficientStock`] and no stock is mutated.
    /// Unknown items have zero available units.
    async fn decrement(&self, lines: Vec<DecrementLine>) -> Result<()>;
}

/// Validates a decrement batch before any stock is read.
pub fn validate_decrement(lines: &[DecrementLine]) -> Result<()> {
    match lines.iter().find(|line| line.quantity == 0) {
        Some(line) => Err(StockStoreError::InvalidQuantity {
            item_id: line.id.clone(),
            quantity: line.quantity,
        }),
        None => Ok(()),
    }
}

/// Computes the post-decrement stock of every touched item.
///
/// `current` supplies the committed stock for an item the batch has not
/// touched yet.
pub(crate) fn plan_decrement<F>(
    lines: &[DecrementLine],
    mut current: F,
) -> Result<BTreeMap<ItemId, u32>>
where
    F: FnMut(&ItemId) -> u32,
{
    let mut running: BTreeMap<ItemId, u32> = BTreeMap::new();

    for line in lines {
        let available = match running.get(&line.id) {
            Some(stock) => *stock,
            None => current(&line.id),
        };

        if available < line.quantity {
            return Err(StockStoreError::InsufficientStock {
                item_id: line.id.clone(),
                available,
                requested: line.quantity,
            });
        }

        running.insert(line.id.clone(), available - line.quantity);
    }

    Ok(running)
}

/// Records the outcome of a decrement batch.
pub(crate) fn record_decrement(outcome: &Result<()>, started: Instant) {
    let label = match outcome {
        Ok(()) => "committed",
        Err(StockStoreError::InsufficientStock { .. }) => "insufficient_stock",
        Err(StockStoreError::InvalidQuantity { .. }) => "invalid_quantity",
        Err(_) => "error",
    };
    metrics::counter!("stock_decrements_total", "outcome" => label).increment(1);
    metrics::histogram!("stock_decrement_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}
