//! Cart engine: kit selection and capped meal quantities.

mod aggregate;
mod events;
mod session;
mod state;

pub use aggregate::{Cart, CartItem};
pub use events::{
    CartClearedData, CartEvent, ItemAddedData, ItemRemovedData, KitLimitReachedData,
    KitSelectedData, QuantityChangedData,
};
pub use session::CartSession;
pub use state::CartState;

use common::ItemId;
use thiserror::Error;

/// Rejections from cart decisions. The cart is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// No kit has been selected yet.
    #[error("Select a kit before adding meals")]
    NoKitSelected,

    /// The item has no stock at all.
    #[error("Item {item_id} is out of stock")]
    OutOfStock { item_id: ItemId },

    /// The cart already holds every unit in stock for this item.
    #[error("Only {stock} units of item {item_id} are available")]
    ItemStockLimitReached { item_id: ItemId, stock: u32 },

    /// Every meal slot of the kit is filled.
    #[error("Kit limit reached: the kit holds {total_meals} meals")]
    KitLimitReached { total_meals: u32 },

    /// The item is not on the menu.
    #[error("Item not found: {item_id}")]
    ItemNotFound { item_id: ItemId },
}

impl CartError {
    /// True for the rejection surfaced as the prominent "kit is full" notice.
    pub fn is_limit_notification(&self) -> bool {
        matches!(self, CartError::KitLimitReached { .. })
    }

    /// Short label used in metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            CartError::NoKitSelected => "no_kit_selected",
            CartError::OutOfStock { .. } => "out_of_stock",
            CartError::ItemStockLimitReached { .. } => "item_stock_limit",
            CartError::KitLimitReached { .. } => "kit_limit",
            CartError::ItemNotFound { .. } => "item_not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_notification_flag() {
        assert!(CartError::KitLimitReached { total_meals: 5 }.is_limit_notification());
        assert!(!CartError::NoKitSelected.is_limit_notification());
    }

    #[test]
    fn test_error_messages() {
        let err = CartError::ItemStockLimitReached {
            item_id: ItemId::new("9"),
            stock: 2,
        };
        assert_eq!(err.to_string(), "Only 2 units of item 9 are available");
        assert_eq!(err.reason(), "item_stock_limit");
    }
}
