//! Shared types for the commerce services.

mod types;

pub use types::{ETag, EntityId};
