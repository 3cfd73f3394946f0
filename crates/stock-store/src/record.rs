//! Stock records and request payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Current stock of every stored item, keyed by item id.
pub type StockLevels = BTreeMap<ItemId, u32>;

/// Stored stock for one menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub item_id: ItemId,

    /// Display title as last sent by the admin panel.
    pub title: Option<String>,

    /// Sellable units.
    pub stock: u32,

    pub last_updated: DateTime<Utc>,
}

/// One entry of a bulk stock upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub id: ItemId,
    #[serde(default)]
    pub title: Option<String>,
    pub stock: u32,
}

impl StockUpdate {
    pub fn new(id: impl Into<ItemId>, stock: u32) -> Self {
        Self {
            id: id.into(),
            title: None,
            stock,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// One line of a batch decrement: take `quantity` units of item `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecrementLine {
    pub id: ItemId,
    pub quantity: u32,
}

impl DecrementLine {
    pub fn new(id: impl Into<ItemId>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}
