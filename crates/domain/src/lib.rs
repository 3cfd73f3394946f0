//! Domain layer for the meal-kit storefront.
//!
//! This crate provides:
//! - the catalog of kits and menu items, and the shared catalog store
//! - the kit-capacity cart engine with its events and session façade
//! - checkout: form validation, delivery zones, and order placement

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod event;

pub use cart::{Cart, CartError, CartEvent, CartItem, CartSession, CartState};
pub use catalog::{
    CatalogSnapshot, CatalogStore, CategoryGroup, KitDefinition, MenuItem, Money, default_catalog,
    default_kits, default_menu, default_stock,
};
pub use checkout::{
    CheckoutDetails, CheckoutError, CheckoutService, DeliveryZone, DeliveryZones, Fulfillment,
    FulfillmentRequest, OrderLine, OrderSubmission, PaymentMethod, PickupPoint,
    default_pickup_point, default_zones,
};
pub use error::DomainError;
pub use event::DomainEvent;
