//! Authoritative stock storage for the storefront.
//!
//! Exposes stock reads, bulk and single-item upserts, and an all-or-nothing
//! batch decrement that never drives stock negative. Two backends share the
//! [`StockStore`] trait: [`InMemoryStockStore`] and [`PostgresStockStore`].

pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use common::ItemId;
pub use error::{Result, StockStoreError};
pub use memory::InMemoryStockStore;
pub use postgres::PostgresStockStore;
pub use record::{DecrementLine, StockLevels, StockRecord, StockUpdate};
pub use store::{StockStore, validate_decrement};
