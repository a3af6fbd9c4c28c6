//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::entity::{Entity, EntityInfo};

use super::{CustomerId, Money, OrderItem, OrderState};

/// Order aggregate root.
///
/// A plain data holder: field-level typing aside, all invariant checking
/// happens in the repository and service layers. The order total is derived
/// from the line items on demand and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Identity and concurrency token.
    #[serde(flatten)]
    info: EntityInfo,

    /// Customer who placed the order.
    customer_id: CustomerId,

    /// When the order was placed.
    order_date: DateTime<Utc>,

    /// Ordered line items. May be empty, never null.
    items: Vec<OrderItem>,

    /// Where the order ships to.
    shipping_address: Address,

    /// Current state of the order.
    state: OrderState,
}

impl Entity for Order {
    fn collection() -> &'static str {
        "orders"
    }

    fn info(&self) -> &EntityInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut EntityInfo {
        &mut self.info
    }
}

impl Order {
    /// Creates a new order in the initial state, not yet persisted.
    pub fn new(
        customer_id: CustomerId,
        order_date: DateTime<Utc>,
        items: Vec<OrderItem>,
        shipping_address: Address,
    ) -> Self {
        Self {
            info: EntityInfo::default(),
            customer_id,
            order_date,
            items,
            shipping_address,
            state: OrderState::Created,
        }
    }

    /// Returns the customer reference.
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the order date.
    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    /// Returns the line items.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns the shipping address.
    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    /// Returns the current state.
    pub fn state(&self) -> OrderState {
        self.state
    }

    /// Sets the order state. Transition validation happens in the
    /// repository's `update_state`, not here.
    pub fn set_state(&mut self, state: OrderState) {
        self.state = state;
    }

    /// Returns the order total: the sum of the line-item prices.
    pub fn total(&self) -> Money {
        self.items.iter().map(|item| item.product_price).sum()
    }

    /// Returns true if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
