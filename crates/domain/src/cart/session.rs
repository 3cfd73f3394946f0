//! Cart session: decides, applies, and records cart changes.

use common::ItemId;

use crate::catalog::{CatalogSnapshot, KitDefinition, MenuItem};
use crate::event::DomainEvent;

use super::{Cart, CartError, CartEvent};

/// Owns one cart and commits the events its decisions produce.
///
/// Every method returns the committed events so the caller can react to
/// them, e.g. surface the `KitLimitReached` notification.
#[derive(Debug, Clone, Default)]
pub struct CartSession {
    cart: Cart,
}

impl CartSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cart(cart: Cart) -> Self {
        Self { cart }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn into_cart(self) -> Cart {
        self.cart
    }

    #[tracing::instrument(skip(self, kit), fields(kit_id = %kit.id))]
    pub fn select_kit(&mut self, kit: KitDefinition) -> Vec<CartEvent> {
        let events = self.cart.select_kit(kit);
        self.commit(events)
    }

    #[tracing::instrument(skip(self, item), fields(item_id = %item.id))]
    pub fn add_one(&mut self, item: &MenuItem) -> Result<Vec<CartEvent>, CartError> {
        let decision = self.cart.add_one(item);
        self.commit_decision(decision)
    }

    #[tracing::instrument(skip(self, catalog))]
    pub fn change_quantity(
        &mut self,
        item_id: &ItemId,
        delta: i32,
        catalog: &CatalogSnapshot,
    ) -> Result<Vec<CartEvent>, CartError> {
        let decision = self.cart.change_quantity(item_id, delta, catalog);
        self.commit_decision(decision)
    }

    pub fn clear(&mut self) -> Vec<CartEvent> {
        let events = self.cart.clear();
        self.commit(events)
    }

    /// Clamps the cart to a refreshed catalog.
    #[tracing::instrument(skip_all)]
    pub fn reconcile(&mut self, catalog: &CatalogSnapshot) -> Vec<CartEvent> {
        let events = self.cart.reconcile(catalog);
        if !events.is_empty() {
            tracing::info!(changes = events.len(), "Cart adjusted to refreshed stock");
        }
        self.commit(events)
    }

    fn commit_decision(
        &mut self,
        decision: Result<Vec<CartEvent>, CartError>,
    ) -> Result<Vec<CartEvent>, CartError> {
        match decision {
            Ok(events) => Ok(self.commit(events)),
            Err(e) => {
                metrics::counter!("cart_rejections_total", "reason" => e.reason()).increment(1);
                tracing::debug!(error = %e, "Cart change rejected");
                Err(e)
            }
        }
    }

    fn commit(&mut self, events: Vec<CartEvent>) -> Vec<CartEvent> {
        for event in &events {
            metrics::counter!("cart_events_total", "event_type" => event.event_type())
                .increment(1);
            if let CartEvent::KitLimitReached(data) = event {
                tracing::info!(total_meals = data.total_meals, "Kit limit reached");
            }
        }
        self.cart.apply_events(events.iter().cloned());
        events
    }
}
