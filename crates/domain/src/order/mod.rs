//! Order aggregate and related types.

mod aggregate;
mod repository;
mod service;
mod state;
mod value_objects;

pub use aggregate::Order;
pub use repository::OrderRepository;
pub use service::OrderService;
pub use state::OrderState;
pub use value_objects::{CustomerId, Money, OrderItem, ProductId};

use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The requested state is not reachable from the current one.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: OrderState, to: OrderState },
}
