//! Domain error types.

use stock_store::StockStoreError;
use thiserror::Error;

use crate::cart::CartError;
use crate::checkout::CheckoutError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A cart decision was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// The order could not be checked out.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// An error occurred in the stock store.
    #[error("Stock store error: {0}")]
    StockStore(#[from] StockStoreError),
}

impl DomainError {
    /// Short label used in metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            DomainError::Cart(e) => e.reason(),
            DomainError::Checkout(e) => e.reason(),
            DomainError::StockStore(StockStoreError::InsufficientStock { .. }) => {
                "insufficient_stock"
            }
            DomainError::StockStore(StockStoreError::InvalidQuantity { .. }) => "invalid_quantity",
            DomainError::StockStore(_) => "storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use common::ItemId;

    use super::*;

    #[test]
    fn test_reason_labels() {
        let err: DomainError = StockStoreError::InsufficientStock {
            item_id: ItemId::new("1"),
            available: 3,
            requested: 5,
        }
        .into();
        assert_eq!(err.reason(), "insufficient_stock");

        let err: DomainError = CartError::NoKitSelected.into();
        assert_eq!(err.reason(), "no_kit_selected");
        assert_eq!(err.to_string(), "Cart error: Select a kit before adding meals");
    }
}
