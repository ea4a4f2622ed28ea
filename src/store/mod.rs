//! Read access to the memory store.
//!
//! Collection lookup is an explicit two-step protocol: ask
//! [`MemoryStore::collection_exists`], then [`MemoryStore::open_collection`].
//! A missing collection is an answer, not an error.

pub mod sqlite;

use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

pub use sqlite::SqliteStore;

/// Arbitrary key/value metadata attached to one record.
pub type RecordMetadata = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot open store at {}: {reason}", .path.display())]
    Unreachable { path: PathBuf, reason: String },

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("store query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("{} is not a memory store (missing tables: {})", .path.display(), .missing.join(", "))]
    Unrecognized {
        path: PathBuf,
        missing: Vec<&'static str>,
    },
}

/// A store holding named collections of records.
pub trait MemoryStore {
    fn collection_exists(&self, name: &str) -> Result<bool, StoreError>;

    fn open_collection(&self, name: &str) -> Result<Box<dyn Collection + '_>, StoreError>;
}

/// One named partition of records.
pub trait Collection {
    /// Metadata of at most `limit` records in insertion order. `None` entries are
    /// records stored without metadata.
    fn metadata(&self, limit: usize) -> Result<Vec<Option<RecordMetadata>>, StoreError>;
}
