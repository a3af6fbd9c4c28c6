//! Domain error types.

use common::EntityId;
use document_store::DocumentStoreError;
use thiserror::Error;

use crate::order::OrderError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the document store.
    #[error("Document store error: {0}")]
    Store(#[from] DocumentStoreError),

    /// An error occurred in the order aggregate.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Entity not found.
    #[error("{entity_type} not found: {id}")]
    EntityNotFound {
        entity_type: &'static str,
        id: EntityId,
    },

    /// An update was attempted on an entity that was never persisted.
    #[error("{entity_type} id is required for update")]
    IdRequired { entity_type: &'static str },

    /// An update was attempted without the concurrency token.
    #[error("{entity_type} concurrency token is required for update")]
    TokenRequired { entity_type: &'static str },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
