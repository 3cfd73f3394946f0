//! Cart completion state machine.

use serde::{Deserialize, Serialize};

/// The completion state of a cart session.
///
/// State transitions:
/// ```text
/// Empty ──► Filling ◄──► Complete
///   ▲          │            │
///   └──────────┴────────────┘   (select kit / clear / remove all)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CartState {
    /// No kit selected or nothing picked yet.
    #[default]
    Empty,

    /// Some meals picked, kit not full.
    Filling,

    /// Every meal slot of the kit is filled; checkout is allowed.
    Complete,
}

impl CartState {
    /// Derives the state from the reserved total and kit capacity.
    pub fn from_totals(reserved: u32, capacity: Option<u32>) -> Self {
        match capacity {
            None => CartState::Empty,
            Some(_) if reserved == 0 => CartState::Empty,
            Some(capacity) if reserved == capacity => CartState::Complete,
            Some(_) => CartState::Filling,
        }
    }

    /// Returns true if checkout may proceed in this state.
    pub fn can_checkout(&self) -> bool {
        matches!(self, CartState::Complete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CartState::Empty => "Empty",
            CartState::Filling => "Filling",
            CartState::Complete => "Complete",
        }
    }
}

impl std::fmt::Display for CartState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
