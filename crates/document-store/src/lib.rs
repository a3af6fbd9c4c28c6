pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::{ETag, EntityId};
pub use document::Document;
pub use error::{DocumentStoreError, Result};
pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use store::{DocumentStore, DocumentStoreExt};
