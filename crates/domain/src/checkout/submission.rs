//! Checkout form input and the resulting order submission.

use chrono::{DateTime, Utc};
use common::{ItemId, KitId, OrderId};
use serde::{Deserialize, Serialize};

use crate::catalog::Money;

use super::{CheckoutError, DeliveryZones};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Pix,
    /// Payment link sent to the customer.
    Link,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "pix",
            PaymentMethod::Link => "link",
        }
    }
}

/// Fulfillment as typed by the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FulfillmentRequest {
    Pickup {
        #[serde(default)]
        pickup_time: String,
    },
    Delivery {
        #[serde(default)]
        cep: Option<String>,
        #[serde(default)]
        street: String,
        #[serde(default)]
        number: String,
        #[serde(default)]
        neighborhood: String,
    },
}

/// Validated fulfillment with the neighborhood resolved to its zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Fulfillment {
    Pickup {
        pickup_time: String,
    },
    Delivery {
        cep: String,
        street: String,
        number: String,
        neighborhood: String,
        zone: String,
    },
}

/// Customer-supplied checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub customer_name: String,
    pub fulfillment: FulfillmentRequest,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub observation: Option<String>,
}

/// Form fields after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDetails {
    pub customer_name: String,
    pub fulfillment: Fulfillment,
    pub delivery_fee: Money,
    pub payment_method: PaymentMethod,
    pub observation: Option<String>,
}

impl CheckoutDetails {
    /// Validates the form and prices the delivery.
    ///
    /// The customer must give a full name (at least two words). Delivery
    /// needs a street, a number, a served neighborhood, and a CEP with eight
    /// digits. Pickup needs a pickup time.
    pub fn validate(self, zones: &DeliveryZones) -> Result<ValidatedDetails, CheckoutError> {
        let customer_name = self.customer_name.trim().to_string();
        if customer_name.split_whitespace().count() < 2 {
            return Err(CheckoutError::MissingCustomerName);
        }

        let (fulfillment, delivery_fee) = match self.fulfillment {
            FulfillmentRequest::Pickup { pickup_time } => {
                let pickup_time = pickup_time.trim().to_string();
                if pickup_time.is_empty() {
                    return Err(CheckoutError::MissingPickupTime);
                }
                (Fulfillment::Pickup { pickup_time }, Money::zero())
            }
            FulfillmentRequest::Delivery {
                cep,
                street,
                number,
                neighborhood,
            } => {
                let street = street.trim().to_string();
                let number = number.trim().to_string();
                if street.is_empty() || number.is_empty() {
                    return Err(CheckoutError::MissingAddress);
                }

                let found = zones.locate(&neighborhood).ok_or_else(|| {
                    CheckoutError::UnknownNeighborhood {
                        neighborhood: neighborhood.trim().to_string(),
                    }
                })?;

                let cep = cep.map(|c| c.trim().to_string()).unwrap_or_default();
                if cep.is_empty() {
                    return Err(CheckoutError::MissingCep);
                }
                if cep.chars().filter(char::is_ascii_digit).count() != 8 {
                    return Err(CheckoutError::InvalidCep { cep });
                }

                (
                    Fulfillment::Delivery {
                        cep,
                        street,
                        number,
                        neighborhood: found.neighborhood.to_string(),
                        zone: found.zone.label.clone(),
                    },
                    found.zone.fee,
                )
            }
        };

        let observation = self
            .observation
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty());

        Ok(ValidatedDetails {
            customer_name,
            fulfillment,
            delivery_fee,
            payment_method: self.payment_method,
            observation,
        })
    }
}

/// One picked meal in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub title: String,
    pub quantity: u32,
}

/// A placed order, handed to whatever delivers it to the kitchen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub order_id: OrderId,
    pub kit_id: KitId,
    pub kit_name: String,
    pub lines: Vec<OrderLine>,
    pub customer_name: String,
    pub fulfillment: Fulfillment,
    pub payment_method: PaymentMethod,
    pub observation: Option<String>,

    /// Kit price; meals are not priced individually.
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub total: Money,
    pub placed_at: DateTime<Utc>,
}

impl OrderSubmission {
    /// Total number of meals in the order.
    pub fn meal_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::default_zones;

    fn delivery(neighborhood: &str, cep: Option<&str>) -> CheckoutDetails {
        CheckoutDetails {
            customer_name: "Maria Silva".to_string(),
            fulfillment: FulfillmentRequest::Delivery {
                cep: cep.map(str::to_string),
                street: "Rua Maria Minervina".to_string(),
                number: "375".to_string(),
                neighborhood: neighborhood.to_string(),
            },
            payment_method: PaymentMethod::Pix,
            observation: None,
        }
    }

    fn pickup(time: &str) -> CheckoutDetails {
        CheckoutDetails {
            customer_name: "João Souza".to_string(),
            fulfillment: FulfillmentRequest::Pickup {
                pickup_time: time.to_string(),
            },
            payment_method: PaymentMethod::Link,
            observation: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_delivery_resolves_zone_fee() {
        let validated = delivery("prata", Some("58400-000"))
            .validate(&default_zones())
            .unwrap();
        assert_eq!(validated.delivery_fee, Money::from_reais(9));
        assert!(matches!(
            validated.fulfillment,
            Fulfillment::Delivery { ref neighborhood, .. } if neighborhood == "Prata"
        ));
    }

    #[test]
    fn test_pickup_is_free() {
        let validated = pickup("12:00").validate(&default_zones()).unwrap();
        assert!(validated.delivery_fee.is_zero());
        assert_eq!(validated.observation, None);
    }

    #[test]
    fn test_requires_full_name() {
        let mut details = pickup("12:00");
        details.customer_name = "Maria".to_string();
        assert_eq!(
            details.validate(&default_zones()),
            Err(CheckoutError::MissingCustomerName)
        );
    }

    #[test]
    fn test_requires_pickup_time() {
        assert_eq!(
            pickup(" ").validate(&default_zones()),
            Err(CheckoutError::MissingPickupTime)
        );
    }

    #[test]
    fn test_requires_address() {
        let mut details = delivery("Centro", None);
        if let FulfillmentRequest::Delivery { number, .. } = &mut details.fulfillment {
            number.clear();
        }
        assert_eq!(
            details.validate(&default_zones()),
            Err(CheckoutError::MissingAddress)
        );
    }

    #[test]
    fn test_rejects_unknown_neighborhood() {
        assert!(matches!(
            delivery("Copacabana", None).validate(&default_zones()),
            Err(CheckoutError::UnknownNeighborhood { .. })
        ));
    }

    #[test]
    fn test_delivery_requires_cep() {
        assert_eq!(
            delivery("Centro", None).validate(&default_zones()),
            Err(CheckoutError::MissingCep)
        );
        assert_eq!(
            delivery("Centro", Some("   ")).validate(&default_zones()),
            Err(CheckoutError::MissingCep)
        );
    }

    #[test]
    fn test_rejects_short_cep() {
        assert!(matches!(
            delivery("Centro", Some("5840")).validate(&default_zones()),
            Err(CheckoutError::InvalidCep { .. })
        ));
    }

    #[test]
    fn test_fulfillment_wire_shape() {
        let json = r#"{
            "customer_name": "Maria Silva",
            "fulfillment": { "type": "pickup", "pickup_time": "11:30" },
            "payment_method": "pix"
        }"#;
        let details: CheckoutDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.payment_method, PaymentMethod::Pix);
        assert!(matches!(
            details.fulfillment,
            FulfillmentRequest::Pickup { .. }
        ));
    }
}
