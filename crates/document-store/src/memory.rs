use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{Document, DocumentStore, DocumentStoreError, ETag, EntityId, Result};

/// In-memory document store implementation.
///
/// Stores all documents in memory and provides the same interface and
/// concurrency semantics as the PostgreSQL implementation. Used by tests
/// and as the default store when no database is configured.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, HashMap<EntityId, Document>>>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of documents stored across all collections.
    pub async fn document_count(&self) -> usize {
        self.collections
            .read()
            .await
            .values()
            .map(HashMap::len)
            .sum()
    }

    /// Clears all documents.
    pub async fn clear(&self) {
        self.collections.write().await.clear();
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        id: EntityId,
        body: serde_json::Value,
    ) -> Result<Document> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        if documents.contains_key(&id) {
            return Err(DocumentStoreError::DuplicateId {
                collection: collection.to_string(),
                id,
            });
        }

        let doc = Document::new_revision(collection, id, body);
        documents.insert(id, doc.clone());
        Ok(doc)
    }

    async fn get(&self, collection: &str, id: EntityId) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.get(&id))
            .cloned())
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut docs: Vec<_> = collections
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default();
        // Stable order for callers and tests
        docs.sort_by_key(|d| d.id.as_uuid());
        Ok(docs)
    }

    async fn replace(
        &self,
        collection: &str,
        id: EntityId,
        expected: &ETag,
        body: serde_json::Value,
    ) -> Result<Document> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        let current = documents
            .get(&id)
            .ok_or_else(|| DocumentStoreError::NotFound {
                collection: collection.to_string(),
                id,
            })?;

        if &current.etag != expected {
            return Err(DocumentStoreError::ConcurrencyConflict {
                collection: collection.to_string(),
                id,
                expected: expected.clone(),
                actual: current.etag.clone(),
            });
        }

        let doc = Document {
            collection: collection.to_string(),
            id,
            etag: ETag::generate(),
            updated_at: Utc::now(),
            body,
        };
        documents.insert(id, doc.clone());
        Ok(doc)
    }

    async fn delete(&self, collection: &str, id: EntityId) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|documents| documents.remove(&id));
        Ok(u64::from(removed.is_some()))
    }
}
