//! Cart domain events.

use common::ItemId;
use serde::{Deserialize, Serialize};

use crate::catalog::{KitDefinition, MenuItem};
use crate::event::DomainEvent;

/// Events produced by cart decisions.
///
/// `KitLimitReached` is a post-commit notification: it is always the last
/// event of a batch and applying it changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CartEvent {
    /// A kit was selected and the cart emptied.
    KitSelected(KitSelectedData),

    /// An item entered the cart.
    ItemAdded(ItemAddedData),

    /// The quantity of an item already in the cart changed.
    QuantityChanged(QuantityChangedData),

    /// An item left the cart.
    ItemRemoved(ItemRemovedData),

    /// All items were removed; the kit stays selected.
    CartCleared(CartClearedData),

    /// The cart just became complete.
    KitLimitReached(KitLimitReachedData),
}

impl DomainEvent for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::KitSelected(_) => "KitSelected",
            CartEvent::ItemAdded(_) => "ItemAdded",
            CartEvent::QuantityChanged(_) => "QuantityChanged",
            CartEvent::ItemRemoved(_) => "ItemRemoved",
            CartEvent::CartCleared(_) => "CartCleared",
            CartEvent::KitLimitReached(_) => "KitLimitReached",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitSelectedData {
    pub kit: KitDefinition,

    /// Units dropped from the previous cart.
    pub discarded_units: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAddedData {
    /// Catalog entry as seen when the item was added.
    pub item: MenuItem,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChangedData {
    pub item_id: ItemId,
    pub old_quantity: u32,
    pub new_quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemovedData {
    pub item_id: ItemId,
    pub old_quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartClearedData {
    pub discarded_units: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitLimitReachedData {
    pub total_meals: u32,
}

impl CartEvent {
    pub(crate) fn kit_selected(kit: KitDefinition, discarded_units: u32) -> Self {
        CartEvent::KitSelected(KitSelectedData {
            kit,
            discarded_units,
        })
    }

    pub(crate) fn item_added(item: &MenuItem, quantity: u32) -> Self {
        CartEvent::ItemAdded(ItemAddedData {
            item: item.clone(),
            quantity,
        })
    }

    pub(crate) fn quantity_changed(item_id: ItemId, old_quantity: u32, new_quantity: u32) -> Self {
        CartEvent::QuantityChanged(QuantityChangedData {
            item_id,
            old_quantity,
            new_quantity,
        })
    }

    pub(crate) fn item_removed(item_id: ItemId, old_quantity: u32) -> Self {
        CartEvent::ItemRemoved(ItemRemovedData {
            item_id,
            old_quantity,
        })
    }

    pub(crate) fn cart_cleared(discarded_units: u32) -> Self {
        CartEvent::CartCleared(CartClearedData { discarded_units })
    }

    pub(crate) fn kit_limit_reached(total_meals: u32) -> Self {
        CartEvent::KitLimitReached(KitLimitReachedData { total_meals })
    }

    /// Returns true for the post-commit "kit is full" notification.
    pub fn is_limit_notification(&self) -> bool {
        matches!(self, CartEvent::KitLimitReached(_))
    }
}
