use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{ETag, EntityId};

/// A stored document: one row per aggregate, keyed by collection and id.
///
/// The concurrency token lives here, next to the body, and is assigned by
/// the store on every successful write. The body is the aggregate's JSON
/// representation and never carries the token itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The collection (aggregate type) this document belongs to.
    pub collection: String,

    /// The entity this document represents.
    pub id: EntityId,

    /// Concurrency token for the stored revision.
    pub etag: ETag,

    /// When the document was last written.
    pub updated_at: DateTime<Utc>,

    /// The aggregate state as JSON.
    pub body: serde_json::Value,
}

impl Document {
    /// Creates a document for a brand-new revision, stamping a fresh token
    /// and the current time.
    pub fn new_revision(
        collection: impl Into<String>,
        id: EntityId,
        body: serde_json::Value,
    ) -> Self {
        Self {
            collection: collection.into(),
            id,
            etag: ETag::generate(),
            updated_at: Utc::now(),
            body,
        }
    }
}
