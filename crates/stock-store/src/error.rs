use thiserror::Error;

use crate::ItemId;

/// Errors that can occur when interacting with the stock store.
#[derive(Debug, Error)]
pub enum StockStoreError {
    /// A decrement line asked for more units than are available.
    /// The whole batch was rejected and nothing was mutated.
    #[error("Insufficient stock for item {item_id}: available {available}, requested {requested}")]
    InsufficientStock {
        item_id: ItemId,
        available: u32,
        requested: u32,
    },

    /// A decrement line carried a zero quantity.
    #[error("Invalid quantity for item {item_id}: {quantity} (must be greater than 0)")]
    InvalidQuantity { item_id: ItemId, quantity: u32 },

    /// A stored stock value does not fit the domain range.
    #[error("Invalid stored stock for item {item_id}: {value}")]
    InvalidStoredStock { item_id: ItemId, value: i64 },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StockStoreError {
    /// Returns true for failures caused by the request rather than storage.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StockStoreError::InsufficientStock { .. } | StockStoreError::InvalidQuantity { .. }
        )
    }
}

/// Result type for stock store operations.
pub type Result<T> = std::result::Result<T, StockStoreError>;
