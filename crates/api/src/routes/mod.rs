//! Route handlers and shared application state.

pub mod customers;
pub mod health;
pub mod metrics;
pub mod orders;

use common::EntityId;
use document_store::DocumentStore;
use domain::{CustomerService, OrderService};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: DocumentStore> {
    pub customer_service: CustomerService<S>,
    pub order_service: OrderService<S>,
}

pub(crate) fn parse_entity_id(id: &str) -> Result<EntityId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(EntityId::from(uuid))
}
