//! Checkout: turns a complete cart into an order submission.

mod service;
mod submission;
mod zones;

pub use service::CheckoutService;
pub use submission::{
    CheckoutDetails, Fulfillment, FulfillmentRequest, OrderLine, OrderSubmission, PaymentMethod,
    ValidatedDetails,
};
pub use zones::{
    DeliveryZone, DeliveryZones, PickupPoint, ZoneMatch, default_pickup_point, default_zones,
};

use common::KitId;
use thiserror::Error;

/// Errors that stop an order from being placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// The cart does not fill the kit exactly.
    #[error("Kit incomplete: {selected} of {required} meals selected")]
    KitIncomplete { selected: u32, required: u32 },

    #[error("Customer full name is required")]
    MissingCustomerName,

    #[error("Street and number are required for delivery")]
    MissingAddress,

    #[error("Pickup time is required")]
    MissingPickupTime,

    #[error("CEP is required for delivery")]
    MissingCep,

    #[error("Invalid CEP: {cep}")]
    InvalidCep { cep: String },

    /// The neighborhood is not in any delivery zone.
    #[error("We do not deliver to {neighborhood}")]
    UnknownNeighborhood { neighborhood: String },

    #[error("Kit not found: {kit_id}")]
    UnknownKit { kit_id: KitId },
}

impl CheckoutError {
    /// Short label used in metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            CheckoutError::KitIncomplete { .. } => "kit_incomplete",
            CheckoutError::MissingCustomerName => "missing_customer_name",
            CheckoutError::MissingAddress => "missing_address",
            CheckoutError::MissingPickupTime => "missing_pickup_time",
            CheckoutError::MissingCep => "missing_cep",
            CheckoutError::InvalidCep { .. } => "invalid_cep",
            CheckoutError::UnknownNeighborhood { .. } => "unknown_neighborhood",
            CheckoutError::UnknownKit { .. } => "unknown_kit",
        }
    }
}
