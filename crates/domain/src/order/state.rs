//! Order state machine.

use serde::{Deserialize, Serialize};

/// The state of an order in its lifecycle.
///
/// State transitions:
/// ```text
/// Created ──┬──► Submitted ──┬──► Shipped
///           │        │       │
///           └────────┴───────┴──► Cancelled
/// ```
///
/// `Shipped` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderState {
    /// Order has been created (initial state).
    #[default]
    Created,

    /// Order has been submitted for fulfillment.
    Submitted,

    /// Order has been shipped (terminal state).
    Shipped,

    /// Order was cancelled (terminal state).
    Cancelled,
}

impl OrderState {
    /// Returns the states reachable from this one.
    ///
    /// The table is the single source of truth for transition checks.
    pub fn allowed_transitions(&self) -> &'static [OrderState] {
        match self {
            OrderState::Created => &[
                OrderState::Submitted,
                OrderState::Shipped,
                OrderState::Cancelled,
            ],
            OrderState::Submitted => &[OrderState::Shipped, OrderState::Cancelled],
            OrderState::Shipped | OrderState::Cancelled => &[],
        }
    }

    /// Returns true if `next` is reachable from this state.
    pub fn can_transition_to(&self, next: OrderState) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Shipped | OrderState::Cancelled)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Created => "Created",
            OrderState::Submitted => "Submitted",
            OrderState::Shipped => "Shipped",
            OrderState::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
