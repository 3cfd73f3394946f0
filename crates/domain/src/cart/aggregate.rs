//! Kit-capacity cart.

use common::ItemId;
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogSnapshot, KitDefinition, MenuItem};

use super::{
    CartError, CartEvent, CartState,
    events::{ItemAddedData, QuantityChangedData},
};

/// A menu item with the quantity reserved for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub item: MenuItem,
    pub quantity: u32,
}

impl CartItem {
    pub fn id(&self) -> &ItemId {
        &self.item.id
    }
}

/// The in-progress selection for one kit.
///
/// Two caps hold after every applied batch: the sum of quantities never
/// exceeds the kit's meal count, and no increase takes an item past its stock.
/// Items are kept in the order they were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    kit: Option<KitDefinition>,
    items: Vec<CartItem>,
}

// Query methods
impl Cart {
    pub fn kit(&self) -> Option<&KitDefinition> {
        self.kit.as_ref()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reserved quantity for an item, 0 when absent.
    pub fn quantity_of(&self, item_id: &ItemId) -> u32 {
        self.items
            .iter()
            .find(|line| line.id() == item_id)
            .map(|line| line.quantity)
            .unwrap_or(0)
    }

    /// Sum of all reserved quantities.
    pub fn total_reserved(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Meals still to pick; 0 without a kit.
    pub fn remaining(&self) -> u32 {
        self.kit
            .as_ref()
            .map(|kit| kit.meals().saturating_sub(self.total_reserved()))
            .unwrap_or(0)
    }

    pub fn is_complete(&self) -> bool {
        self.kit
            .as_ref()
            .is_some_and(|kit| self.total_reserved() == kit.meals())
    }

    /// Checkout is allowed only for a complete cart.
    pub fn can_checkout(&self) -> bool {
        self.is_complete()
    }

    pub fn state(&self) -> CartState {
        CartState::from_totals(self.total_reserved(), self.kit.as_ref().map(KitDefinition::meals))
    }

    /// True when this item cannot be increased further because of its stock.
    ///
    /// Computed from the given catalog entry on every call so a refreshed
    /// stock figure is picked up immediately.
    pub fn is_item_at_stock_limit(&self, item: &MenuItem) -> bool {
        self.quantity_of(&item.id) >= item.stock
    }
}

// Command methods (return events)
impl Cart {
    /// Selects a kit, discarding every item in the cart.
    pub fn select_kit(&self, kit: KitDefinition) -> Vec<CartEvent> {
        vec![CartEvent::kit_selected(kit, self.total_reserved())]
    }

    /// Adds one unit of `item`.
    ///
    /// Guards run in order: out of stock, kit full, item stock reached.
    pub fn add_one(&self, item: &MenuItem) -> Result<Vec<CartEvent>, CartError> {
        let kit = self.kit.as_ref().ok_or(CartError::NoKitSelected)?;

        if item.is_out_of_stock() {
            return Err(CartError::OutOfStock {
                item_id: item.id.clone(),
            });
        }

        let capacity = kit.meals();
        let total = self.total_reserved();
        if total >= capacity {
            return Err(CartError::KitLimitReached {
                total_meals: capacity,
            });
        }

        let current = self.quantity_of(&item.id);
        if current >= item.stock {
            return Err(CartError::ItemStockLimitReached {
                item_id: item.id.clone(),
                stock: item.stock,
            });
        }

        let mut events = vec![increase_event(item, current, 1)];
        if total + 1 == capacity {
            events.push(CartEvent::kit_limit_reached(capacity));
        }
        Ok(events)
    }

    /// Changes the quantity of an item by `delta`.
    ///
    /// Increases are checked against the kit capacity and the item's stock in
    /// `catalog`. Decreases always succeed, floor at zero, and remove the
    /// entry when it reaches zero; decreasing an absent item does nothing.
    pub fn change_quantity(
        &self,
        item_id: &ItemId,
        delta: i32,
        catalog: &CatalogSnapshot,
    ) -> Result<Vec<CartEvent>, CartError> {
        if delta < 0 {
            return Ok(self.decrease(item_id, delta.unsigned_abs()));
        }
        if delta == 0 {
            return Ok(vec![]);
        }

        let increase = delta.unsigned_abs();
        let kit = self.kit.as_ref().ok_or(CartError::NoKitSelected)?;
        let item = catalog.item(item_id).ok_or_else(|| CartError::ItemNotFound {
            item_id: item_id.clone(),
        })?;

        let capacity = kit.meals();
        let total = self.total_reserved();
        if u64::from(total) + u64::from(increase) > u64::from(capacity) {
            return Err(CartError::KitLimitReached {
                total_meals: capacity,
            });
        }

        let current = self.quantity_of(item_id);
        if u64::from(current) + u64::from(increase) > u64::from(item.stock) {
            return Err(CartError::ItemStockLimitReached {
                item_id: item_id.clone(),
                stock: item.stock,
            });
        }

        let mut events = vec![increase_event(item, current, increase)];
        if total + increase == capacity {
            events.push(CartEvent::kit_limit_reached(capacity));
        }
        Ok(events)
    }

    /// Empties the cart, keeping the kit.
    pub fn clear(&self) -> Vec<CartEvent> {
        if self.items.is_empty() {
            return vec![];
        }
        vec![CartEvent::cart_cleared(self.total_reserved())]
    }

    /// Brings quantities back within a refreshed catalog's stock.
    ///
    /// Items no longer on the menu or with zero stock are removed; items above
    /// their stock are lowered to it.
    pub fn reconcile(&self, catalog: &CatalogSnapshot) -> Vec<CartEvent> {
        self.items
            .iter()
            .filter_map(|line| match catalog.stock_of(line.id()) {
                None | Some(0) => Some(CartEvent::item_removed(line.id().clone(), line.quantity)),
                Some(stock) if line.quantity > stock => Some(CartEvent::quantity_changed(
                    line.id().clone(),
                    line.quantity,
                    stock,
                )),
                Some(_) => None,
            })
            .collect()
    }

    fn decrease(&self, item_id: &ItemId, decrease: u32) -> Vec<CartEvent> {
        let current = self.quantity_of(item_id);
        if current == 0 {
            return vec![];
        }

        let new_quantity = current.saturating_sub(decrease);
        if new_quantity == 0 {
            vec![CartEvent::item_removed(item_id.clone(), current)]
        } else {
            vec![CartEvent::quantity_changed(
                item_id.clone(),
                current,
                new_quantity,
            )]
        }
    }
}

fn increase_event(item: &MenuItem, current: u32, increase: u32) -> CartEvent {
    if current == 0 {
        CartEvent::item_added(item, increase)
    } else {
        CartEvent::quantity_changed(item.id.clone(), current, current + increase)
    }
}

// Apply event helpers
impl Cart {
    /// Applies an event. Never fails: events are decisions already taken.
    pub fn apply(&mut self, event: CartEvent) {
        match event {
            CartEvent::KitSelected(data) => {
                self.kit = Some(data.kit);
                self.items.clear();
            }
            CartEvent::ItemAdded(data) => self.apply_item_added(data),
            CartEvent::QuantityChanged(data) => self.apply_quantity_changed(data),
            CartEvent::ItemRemoved(data) => {
                self.items.retain(|line| line.id() != &data.item_id);
            }
            CartEvent::CartCleared(_) => self.items.clear(),
            CartEvent::KitLimitReached(_) => {
                // Notification only
            }
        }
    }

    pub fn apply_events(&mut self, events: impl IntoIterator<Item = CartEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    fn apply_item_added(&mut self, data: ItemAddedData) {
        match self.items.iter_mut().find(|line| line.id() == &data.item.id) {
            Some(line) => line.quantity += data.quantity,
            None => self.items.push(CartItem {
                item: data.item,
                quantity: data.quantity,
            }),
        }
    }

    fn apply_quantity_changed(&mut self, data: QuantityChangedData) {
        if data.new_quantity == 0 {
            self.items.retain(|line| line.id() != &data.item_id);
        } else if let Some(line) = self.items.iter_mut().find(|line| line.id() == &data.item_id) {
            line.quantity = data.new_quantity;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::catalog::Money;

    fn kit(meals: u32) -> KitDefinition {
        KitDefinition::new(
            format!("kit{meals}"),
            format!("Kit {meals}"),
            NonZeroU32::new(meals).unwrap(),
            Money::from_reais(17 * i64::from(meals)),
        )
    }

    fn cart_with_kit(meals: u32) -> Cart {
        let mut cart = Cart::default();
        cart.apply_events(cart.select_kit(kit(meals)));
        cart
    }

    fn add(cart: &mut Cart, item: &MenuItem) -> Vec<CartEvent> {
        let events = cart.add_one(item).unwrap();
        cart.apply_events(events.clone());
        events
    }

    #[test]
    fn test_add_without_kit_fails() {
        let cart = Cart::default();
        let item = MenuItem::new("1", "Bobó", 10);
        assert!(matches!(cart.add_one(&item), Err(CartError::NoKitSelected)));
    }

    #[test]
    fn test_add_out_of_stock_fails() {
        let cart = cart_with_kit(5);
        let item = MenuItem::new("1", "Bobó", 0);
        assert!(matches!(
            cart.add_one(&item),
            Err(CartError::OutOfStock { .. })
        ));
    }

    #[test]
    fn test_out_of_stock_checked_before_kit_limit() {
        let mut cart = cart_with_kit(1);
        add(&mut cart, &MenuItem::new("1", "Bobó", 10));

        let sold_out = MenuItem::new("2", "Kibe", 0);
        assert!(matches!(
            cart.add_one(&sold_out),
            Err(CartError::OutOfStock { .. })
        ));
    }

    #[test]
    fn test_kit_limit_checked_before_item_stock() {
        let mut cart = cart_with_kit(2);
        let item = MenuItem::new("1", "Bobó", 2);
        add(&mut cart, &item);
        add(&mut cart, &item);

        assert!(matches!(
            cart.add_one(&item),
            Err(CartError::KitLimitReached { total_meals: 2 })
        ));
    }

    #[test]
    fn test_add_creates_then_increments_entry() {
        let mut cart = cart_with_kit(5);
        let item = MenuItem::new("1", "Bobó", 10);

        let events = add(&mut cart, &item);
        assert!(matches!(events[0], CartEvent::ItemAdded(_)));

        let events = add(&mut cart, &item);
        assert!(matches!(
            events[0],
            CartEvent::QuantityChanged(QuantityChangedData {
                old_quantity: 1,
                new_quantity: 2,
                ..
            })
        ));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.quantity_of(&item.id), 2);
    }

    #[test]
    fn test_limit_notification_follows_completing_add() {
        let mut cart = cart_with_kit(2);
        let item = MenuItem::new("1", "Bobó", 10);

        let events = add(&mut cart, &item);
        assert_eq!(events.len(), 1);

        let events = add(&mut cart, &item);
        assert_eq!(events.len(), 2);
        assert!(events[1].is_limit_notification());
        assert!(cart.is_complete());
    }

    #[test]
    fn test_select_kit_clears_items() {
        let mut cart = cart_with_kit(5);
        add(&mut cart, &MenuItem::new("1", "Bobó", 10));

        let events = cart.select_kit(kit(10));
        assert!(matches!(
            &events[0],
            CartEvent::KitSelected(data) if data.discarded_units == 1
        ));
        cart.apply_events(events);

        assert!(cart.is_empty());
        assert_eq!(cart.kit().unwrap().meals(), 10);
        assert_eq!(cart.state(), CartState::Empty);
    }

    #[test]
    fn test_change_quantity_decrease_removes_at_zero() {
        let mut cart = cart_with_kit(5);
        let item = MenuItem::new("1", "Bobó", 10);
        add(&mut cart, &item);
        let catalog = CatalogSnapshot::new(vec![], vec![item.clone()]);

        let events = cart.change_quantity(&item.id, -3, &catalog).unwrap();
        assert!(matches!(events[0], CartEvent::ItemRemoved(_)));
        cart.apply_events(events);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_decrease_absent_is_noop() {
        let cart = cart_with_kit(5);
        let catalog = CatalogSnapshot::default();
        let events = cart
            .change_quantity(&ItemId::new("1"), -1, &catalog)
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_change_quantity_zero_is_noop() {
        let cart = cart_with_kit(5);
        let events = cart
            .change_quantity(&ItemId::new("1"), 0, &CatalogSnapshot::default())
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_change_quantity_increase_uses_catalog_stock() {
        let mut cart = cart_with_kit(5);
        let item = MenuItem::new("1", "Bobó", 10);
        add(&mut cart, &item);

        // Stock dropped to 1 since the item was added.
        let catalog = CatalogSnapshot::new(vec![], vec![MenuItem::new("1", "Bobó", 1)]);
        assert!(matches!(
            cart.change_quantity(&item.id, 1, &catalog),
            Err(CartError::ItemStockLimitReached { stock: 1, .. })
        ));
    }

    #[test]
    fn test_change_quantity_increase_by_many() {
        let mut cart = cart_with_kit(5);
        let item = MenuItem::new("1", "Bobó", 10);
        let catalog = CatalogSnapshot::new(vec![], vec![item.clone()]);

        assert!(matches!(
            cart.change_quantity(&item.id, 6, &catalog),
            Err(CartError::KitLimitReached { total_meals: 5 })
        ));

        let events = cart.change_quantity(&item.id, 5, &catalog).unwrap();
        assert!(events.last().unwrap().is_limit_notification());
        cart.apply_events(events);
        assert!(cart.is_complete());
    }

    #[test]
    fn test_change_quantity_unknown_item() {
        let cart = cart_with_kit(5);
        assert!(matches!(
            cart.change_quantity(&ItemId::new("404"), 1, &CatalogSnapshot::default()),
            Err(CartError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn test_is_item_at_stock_limit_is_derived() {
        let mut cart = cart_with_kit(5);
        let item = MenuItem::new("1", "Bobó", 2);
        add(&mut cart, &item);
        assert!(!cart.is_item_at_stock_limit(&item));

        let refreshed = MenuItem::new("1", "Bobó", 1);
        assert!(cart.is_item_at_stock_limit(&refreshed));
    }

    #[test]
    fn test_reconcile_clamps_and_removes() {
        let mut cart = cart_with_kit(5);
        let bobo = MenuItem::new("1", "Bobó", 10);
        let kibe = MenuItem::new("5", "Kibe", 10);
        let feijuca = MenuItem::new("9", "Feijuca", 10);
        for _ in 0..2 {
            add(&mut cart, &bobo);
        }
        add(&mut cart, &kibe);
        add(&mut cart, &feijuca);

        let catalog = CatalogSnapshot::new(
            vec![],
            vec![MenuItem::new("1", "Bobó", 1), MenuItem::new("5", "Kibe", 0)],
        );
        let events = cart.reconcile(&catalog);
        assert_eq!(events.len(), 3);
        cart.apply_events(events);

        assert_eq!(cart.quantity_of(&bobo.id), 1);
        assert_eq!(cart.quantity_of(&kibe.id), 0);
        assert_eq!(cart.quantity_of(&feijuca.id), 0);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_clear_keeps_kit() {
        let mut cart = cart_with_kit(5);
        add(&mut cart, &MenuItem::new("1", "Bobó", 10));
        cart.apply_events(cart.clear());
        assert!(cart.is_empty());
        assert!(cart.kit().is_some());
        assert!(cart.clear().is_empty());
    }

    #[test]
    fn test_remaining_and_state() {
        let mut cart = Cart::default();
        assert_eq!(cart.remaining(), 0);
        assert!(!cart.can_checkout());

        cart.apply_events(cart.select_kit(kit(3)));
        add(&mut cart, &MenuItem::new("1", "Bobó", 10));
        assert_eq!(cart.remaining(), 2);
        assert_eq!(cart.state(), CartState::Filling);
    }

    #[test]
    fn test_serialization() {
        let mut cart = cart_with_kit(5);
        add(&mut cart, &MenuItem::new("1", "Bobó", 10));

        let json = serde_json::to_string(&cart).unwrap();
        let deserialized: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, cart);
    }
}
