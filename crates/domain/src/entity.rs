//! Core entity trait for persisted aggregates.

use common::{ETag, EntityId};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Identity and concurrency token shared by every aggregate.
///
/// Aggregates embed this value rather than inheriting from a base type.
/// Both fields are None for an instance that has never been persisted;
/// the repository fills them in on the first write.
///
/// The token is not serialized into the document body: the store column
/// is authoritative, and the repository restores it on every load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInfo {
    /// Unique identifier, immutable once assigned.
    pub id: Option<EntityId>,

    /// Concurrency token of the revision this instance was loaded from.
    #[serde(skip)]
    pub etag: Option<ETag>,
}

/// Trait for aggregate roots persisted in the document store.
///
/// An aggregate root owns a consistency boundary for a set of related
/// data. Each aggregate is stored as one document in its own collection
/// and is only ever written as a whole, guarded by the concurrency token.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Returns the collection name this aggregate type is stored under.
    fn collection() -> &'static str;

    /// Returns the embedded identity/token value.
    fn info(&self) -> &EntityInfo;

    /// Returns the embedded identity/token value mutably.
    fn info_mut(&mut self) -> &mut EntityInfo;

    /// Returns the aggregate's unique identifier.
    ///
    /// Returns None for a new, never-persisted instance.
    fn id(&self) -> Option<EntityId> {
        self.info().id
    }

    /// Returns the concurrency token observed at load time.
    ///
    /// Returns None for a new, never-persisted instance.
    fn etag(&self) -> Option<&ETag> {
        self.info().etag.as_ref()
    }

    /// Sets the aggregate's identifier. Called by the repository on add.
    fn set_id(&mut self, id: EntityId) {
        self.info_mut().id = Some(id);
    }

    /// Sets the concurrency token. Called by the repository after every
    /// load and successful write.
    fn set_etag(&mut self, etag: ETag) {
        self.info_mut().etag = Some(etag);
    }
}
