//! Storefront catalog: kits, menu items, and the shell-owned catalog store.

mod defaults;
mod item;
mod money;
mod snapshot;
mod store;

pub use defaults::{default_catalog, default_kits, default_menu, default_stock};
pub use item::{KitDefinition, MenuItem};
pub use money::Money;
pub use snapshot::{CatalogSnapshot, CategoryGroup};
pub use store::CatalogStore;
