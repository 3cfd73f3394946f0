//! Shared identifier types for the meal-kit storefront.

mod types;

pub use types::{ItemId, KitId, OrderId};
