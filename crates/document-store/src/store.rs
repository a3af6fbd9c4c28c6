use async_trait::async_trait;

use crate::{Document, ETag, EntityId, Result};

/// Core trait for document store implementations.
///
/// A document store persists one JSON document per aggregate, keyed by
/// `(collection, id)`, and enforces optimistic concurrency on replacement:
/// a write succeeds only if the caller presents the token currently stored
/// for that document. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document, assigning a fresh concurrency token.
    ///
    /// Fails with `DuplicateId` if a document already exists under the
    /// same collection and id.
    async fn insert(
        &self,
        collection: &str,
        id: EntityId,
        body: serde_json::Value,
    ) -> Result<Document>;

    /// Retrieves a document by identity.
    ///
    /// Returns None if no document exists under the given key.
    async fn get(&self, collection: &str, id: EntityId) -> Result<Option<Document>>;

    /// Retrieves all documents in a collection.
    ///
    /// This is an unfiltered scan with no pagination.
    async fn get_all(&self, collection: &str) -> Result<Vec<Document>>;

    /// Replaces a document's body, compare-and-swapping on the token.
    ///
    /// The write succeeds only if `expected` matches the stored token; the
    /// check and the write are a single atomic operation against the store.
    /// Fails with `NotFound` if the document does not exist and with
    /// `ConcurrencyConflict` if the token does not match. On success the
    /// document carries a freshly assigned token.
    async fn replace(
        &self,
        collection: &str,
        id: EntityId,
        expected: &ETag,
        body: serde_json::Value,
    ) -> Result<Document>;

    /// Deletes a document by identity.
    ///
    /// Returns the number of documents deleted: 0 when the key was absent
    /// (not an error), 1 on success.
    async fn delete(&self, collection: &str, id: EntityId) -> Result<u64>;
}

/// Extension trait providing convenience methods for document stores.
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    /// Checks whether a document exists.
    async fn exists(&self, collection: &str, id: EntityId) -> Result<bool> {
        Ok(self.get(collection, id).await?.is_some())
    }
}

// Blanket implementation for all DocumentStore implementations
impl<T: DocumentStore + ?Sized> DocumentStoreExt for T {}
