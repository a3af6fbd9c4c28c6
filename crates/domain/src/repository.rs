//! Generic repository over the document store.

use std::marker::PhantomData;

use common::EntityId;
use document_store::{Document, DocumentStore, DocumentStoreError};

use crate::entity::Entity;
use crate::error::DomainError;

/// Repository mediating load/save of one aggregate type.
///
/// The repository is responsible for:
/// 1. Serializing the aggregate into a document body
/// 2. Delegating the write to the store, which enforces the token
///    compare-and-swap
/// 3. Restoring identity and token from the store columns on every load
///
/// It performs no retries: a concurrency conflict propagates to the caller,
/// who must re-fetch and retry.
pub struct Repository<S, E>
where
    S: DocumentStore,
    E: Entity,
{
    store: S,
    _phantom: PhantomData<E>,
}

impl<S, E> Repository<S, E>
where
    S: DocumentStore,
    E: Entity,
{
    /// Creates a new repository backed by the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the underlying document store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads an aggregate by identity.
    ///
    /// Returns None if no document exists for the id.
    pub async fn get(&self, id: EntityId) -> Result<Option<E>, DomainError> {
        match self.store.get(E::collection(), id).await? {
            Some(doc) => Ok(Some(Self::from_document(doc)?)),
            None => Ok(None),
        }
    }

    /// Loads every aggregate in the collection. Unfiltered scan.
    pub async fn get_all(&self) -> Result<Vec<E>, DomainError> {
        self.store
            .get_all(E::collection())
            .await?
            .into_iter()
            .map(Self::from_document)
            .collect()
    }

    /// Persists a new aggregate.
    ///
    /// Assigns an identity if the aggregate has none, inserts the document,
    /// and returns the aggregate carrying the store-assigned token. Fails
    /// with a duplicate-id conflict if the identity already exists.
    pub async fn add(&self, mut entity: E) -> Result<E, DomainError> {
        let id = match entity.id() {
            Some(id) => id,
            None => {
                let id = EntityId::new();
                entity.set_id(id);
                id
            }
        };

        let body = serde_json::to_value(&entity)?;
        let doc = self.store.insert(E::collection(), id, body).await?;
        entity.set_etag(doc.etag);

        metrics::counter!("repository_writes_total").increment(1);
        Ok(entity)
    }

    /// Persists changes to an existing aggregate.
    ///
    /// The aggregate must carry its identity and the token observed on the
    /// last read; the store rejects the write if the token is stale. On
    /// success the aggregate carries the refreshed token.
    pub async fn update(&self, mut entity: E) -> Result<E, DomainError> {
        let id = entity.id().ok_or(DomainError::IdRequired {
            entity_type: E::collection(),
        })?;
        let expected = entity
            .etag()
            .cloned()
            .ok_or(DomainError::TokenRequired {
                entity_type: E::collection(),
            })?;

        let body = serde_json::to_value(&entity)?;
        let doc = match self.store.replace(E::collection(), id, &expected, body).await {
            Ok(doc) => doc,
            Err(e) => {
                if matches!(e, DocumentStoreError::ConcurrencyConflict { .. }) {
                    metrics::counter!("repository_conflicts_total").increment(1);
                }
                return Err(e.into());
            }
        };
        entity.set_etag(doc.etag);

        metrics::counter!("repository_writes_total").increment(1);
        Ok(entity)
    }

    /// Deletes an aggregate by identity.
    ///
    /// Returns the number of documents deleted: 0 when the id was absent
    /// (not an error), 1 on success.
    pub async fn remove(&self, id: EntityId) -> Result<u64, DomainError> {
        Ok(self.store.delete(E::collection(), id).await?)
    }

    fn from_document(doc: Document) -> Result<E, DomainError> {
        let mut entity: E = serde_json::from_value(doc.body)?;
        // The store columns are authoritative for identity and token
        entity.set_id(doc.id);
        entity.set_etag(doc.etag);
        Ok(entity)
    }
}
