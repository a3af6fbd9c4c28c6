use thiserror::Error;

use common::{ETag, EntityId};

/// Errors that can occur when interacting with the document store.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// A concurrency conflict occurred when replacing a document.
    /// The expected token did not match the stored token.
    #[error(
        "Concurrency conflict for {collection}/{id}: expected token {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        collection: String,
        id: EntityId,
        expected: ETag,
        actual: ETag,
    },

    /// An insert targeted an identity that already exists.
    #[error("Duplicate id in {collection}: {id}")]
    DuplicateId { collection: String, id: EntityId },

    /// The document was not found in the store.
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: EntityId },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, DocumentStoreError>;
