//! Domain event trait.

use serde::Serialize;

/// Facts produced by a decision, named in past tense.
pub trait DomainEvent: Serialize + Send + Sync + Clone {
    /// Returns the event type name, used for logging and metric labels.
    fn event_type(&self) -> &'static str;
}
