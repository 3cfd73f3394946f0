//! Checkout service: validates a complete cart and commits its stock.

use std::sync::Arc;

use chrono::Utc;
use common::OrderId;
use stock_store::{DecrementLine, StockStore};

use crate::cart::{Cart, CartError};
use crate::catalog::{CatalogSnapshot, CatalogStore};
use crate::error::DomainError;

use super::{CheckoutDetails, CheckoutError, DeliveryZones, OrderLine, OrderSubmission, default_zones};

/// Places orders against a stock store.
///
/// The stock decrement is the last step and the final authority: an order is
/// only returned once every meal in it has been taken from stock.
pub struct CheckoutService<S: StockStore> {
    store: S,
    zones: DeliveryZones,
}

impl<S: StockStore> CheckoutService<S> {
    /// Creates a checkout service using the built-in delivery zones.
    pub fn new(store: S) -> Self {
        Self {
            store,
            zones: default_zones(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn zones(&self) -> &DeliveryZones {
        &self.zones
    }

    /// Merges the store's stock levels into the catalog and returns the new snapshot.
    #[tracing::instrument(skip_all)]
    pub async fn refresh_catalog(
        &self,
        catalog: &CatalogStore,
    ) -> Result<Arc<CatalogSnapshot>, DomainError> {
        let levels = self.store.stock_levels().await?;
        Ok(catalog.apply_stock_levels(&levels).await)
    }

    /// Places an order for a complete cart.
    ///
    /// Checks run in order: a kit is selected, the kit is complete, the form
    /// is valid, and finally the whole cart is decremented from stock in one
    /// batch. Nothing is decremented if an earlier check fails.
    #[tracing::instrument(skip_all, fields(kit_id = cart.kit().map(|k| k.id.as_str())))]
    pub async fn place_order(
        &self,
        cart: &Cart,
        details: CheckoutDetails,
    ) -> Result<OrderSubmission, DomainError> {
        let result = self.submit(cart, details).await;

        match &result {
            Ok(order) => {
                metrics::counter!(
                    "orders_placed_total",
                    "payment_method" => order.payment_method.as_str()
                )
                .increment(1);
                tracing::info!(
                    order_id = %order.order_id,
                    meals = order.meal_count(),
                    total = %order.total,
                    "Order placed"
                );
            }
            Err(e) => {
                metrics::counter!("checkout_failures_total", "reason" => e.reason()).increment(1);
                tracing::warn!(error = %e, "Checkout failed");
            }
        }

        result
    }

    async fn submit(
        &self,
        cart: &Cart,
        details: CheckoutDetails,
    ) -> Result<OrderSubmission, DomainError> {
        let kit = cart.kit().ok_or(CartError::NoKitSelected)?;
        if !cart.is_complete() {
            return Err(CheckoutError::KitIncomplete {
                selected: cart.total_reserved(),
                required: kit.meals(),
            }
            .into());
        }

        let details = details.validate(&self.zones)?;

        let decrements = cart
            .items()
            .iter()
            .map(|line| DecrementLine::new(line.id().clone(), line.quantity))
            .collect();
        self.store.decrement(decrements).await?;

        let lines = cart
            .items()
            .iter()
            .map(|line| OrderLine {
                item_id: line.id().clone(),
                title: line.item.title.clone(),
                quantity: line.quantity,
            })
            .collect();

        Ok(OrderSubmission {
            order_id: OrderId::new(),
            kit_id: kit.id.clone(),
            kit_name: kit.name.clone(),
            lines,
            customer_name: details.customer_name,
            fulfillment: details.fulfillment,
            payment_method: details.payment_method,
            observation: details.observation,
            subtotal: kit.price,
            delivery_fee: details.delivery_fee,
            total: kit.price + details.delivery_fee,
            placed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use common::ItemId;
    use stock_store::{InMemoryStockStore, StockStoreError, StockUpdate};

    use super::*;
    use crate::cart::CartSession;
    use crate::catalog::{KitDefinition, MenuItem, Money};
    use crate::checkout::{FulfillmentRequest, PaymentMethod};

    fn pickup_details() -> CheckoutDetails {
        CheckoutDetails {
            customer_name: "Maria Silva".to_string(),
            fulfillment: FulfillmentRequest::Pickup {
                pickup_time: "12:00".to_string(),
            },
            payment_method: PaymentMethod::Pix,
            observation: None,
        }
    }

    fn complete_cart(stock: u32) -> Cart {
        let mut session = CartSession::new();
        session.select_kit(KitDefinition::new(
            "kit2",
            "Kit 2",
            NonZeroU32::new(2).unwrap(),
            Money::from_reais(34),
        ));
        let item = MenuItem::new("1", "Bobó de Frango", stock);
        session.add_one(&item).unwrap();
        session.add_one(&item).unwrap();
        session.into_cart()
    }

    #[tokio::test]
    async fn test_place_order_decrements_stock() {
        let store = InMemoryStockStore::with_stock([StockUpdate::new("1", 5)]);
        let service = CheckoutService::new(store.clone());

        let order = service
            .place_order(&complete_cart(5), pickup_details())
            .await
            .unwrap();

        assert_eq!(order.meal_count(), 2);
        assert_eq!(order.total, Money::from_reais(34));
        let record = store.get(&ItemId::new("1")).await.unwrap().unwrap();
        assert_eq!(record.stock, 3);
    }

    #[tokio::test]
    async fn test_incomplete_cart_is_rejected_before_stock() {
        let store = InMemoryStockStore::with_stock([StockUpdate::new("1", 5)]);
        let service = CheckoutService::new(store.clone());

        let mut session = CartSession::from_cart(complete_cart(5));
        let catalog = CatalogSnapshot::new(vec![], vec![MenuItem::new("1", "Bobó", 5)]);
        session
            .change_quantity(&ItemId::new("1"), -1, &catalog)
            .unwrap();

        let err = service
            .place_order(session.cart(), pickup_details())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Checkout(CheckoutError::KitIncomplete {
                selected: 1,
                required: 2
            })
        ));
        let record = store.get(&ItemId::new("1")).await.unwrap().unwrap();
        assert_eq!(record.stock, 5);
    }

    #[tokio::test]
    async fn test_insufficient_stock_fails_checkout() {
        let store = InMemoryStockStore::with_stock([StockUpdate::new("1", 1)]);
        let service = CheckoutService::new(store);

        let err = service
            .place_order(&complete_cart(5), pickup_details())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::StockStore(StockStoreError::InsufficientStock {
                available: 1,
                requested: 2,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_refresh_catalog() {
        let store = InMemoryStockStore::with_stock([StockUpdate::new("11", 1)]);
        let service = CheckoutService::new(store);
        let catalog = CatalogStore::new(crate::catalog::default_catalog());

        let snapshot = service.refresh_catalog(&catalog).await.unwrap();
        assert_eq!(snapshot.stock_of(&ItemId::new("11")), Some(1));
        assert_eq!(snapshot.stock_of(&ItemId::new("1")), Some(15));
    }
}
