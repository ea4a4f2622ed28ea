//! Record counts grouped by the `type` metadata tag.
//!
//! Counting reads at most [`MAX_RECORDS`] metadata entries in one request, so for
//! very large collections the report describes the first `MAX_RECORDS` records
//! only. Callers that need an exact figure beyond that must query the store
//! themselves.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::store::{MemoryStore, RecordMetadata, SqliteStore, StoreError};

/// Upper bound on metadata entries fetched per report.
pub const MAX_RECORDS: usize = 100_000;

/// Tag used for records without metadata or without a `type` field.
pub const UNKNOWN_TYPE: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Success,
    NewCollection,
    Error,
}

impl ReportStatus {
    /// Process exit code for `memguard stats`.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Success | Self::NewCollection => 0,
            Self::Error => 1,
        }
    }
}

/// The JSON document printed by `memguard stats`.
///
/// `total` always equals the sum of `by_type`. With [`ReportStatus::Success`] it
/// is also the number of entries examined, which is capped at [`MAX_RECORDS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCountReport {
    pub collection: String,
    pub total: u64,
    pub by_type: BTreeMap<String, u64>,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TypeCountReport {
    fn success(collection: &str, by_type: BTreeMap<String, u64>) -> Self {
        Self {
            collection: collection.to_string(),
            total: by_type.values().sum(),
            by_type,
            status: ReportStatus::Success,
            error: None,
        }
    }

    fn new_collection(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            total: 0,
            by_type: BTreeMap::new(),
            status: ReportStatus::NewCollection,
            error: None,
        }
    }

    fn failed(collection: &str, error: &StoreError) -> Self {
        Self {
            collection: collection.to_string(),
            total: 0,
            by_type: BTreeMap::new(),
            status: ReportStatus::Error,
            error: Some(error.to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Report on `collection` in the store at `data_dir`.
pub fn report(collection: &str, data_dir: &Path) -> TypeCountReport {
    info!(collection, data_dir = %data_dir.display(), "collecting store stats");
    report_from(collection, || SqliteStore::open(data_dir))
}

/// Report on `collection` using a store produced by `connect`.
///
/// Every failure, including the connection itself, becomes an `error` report.
pub fn report_from<S, F>(collection: &str, connect: F) -> TypeCountReport
where
    S: MemoryStore,
    F: FnOnce() -> Result<S, StoreError>,
{
    match aggregate(collection, connect) {
        Ok(report) => report,
        Err(e) => {
            warn!(collection, error = %e, "stats aggregation failed");
            TypeCountReport::failed(collection, &e)
        }
    }
}

fn aggregate<S, F>(collection: &str, connect: F) -> Result<TypeCountReport, StoreError>
where
    S: MemoryStore,
    F: FnOnce() -> Result<S, StoreError>,
{
    let store = connect()?;

    if !store.collection_exists(collection)? {
        debug!(collection, "collection does not exist yet");
        return Ok(TypeCountReport::new_collection(collection));
    }

    let handle = store.open_collection(collection)?;
    let entries = handle.metadata(MAX_RECORDS)?;
    debug!(collection, entries = entries.len(), "metadata fetched");

    Ok(TypeCountReport::success(collection, count_by_type(entries)))
}

/// Count entries per type tag.
pub fn count_by_type<I>(entries: I) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = Option<RecordMetadata>>,
{
    let mut counts = BTreeMap::new();
    for meta in entries {
        *counts.entry(type_tag(meta.as_ref())).or_insert(0) += 1;
    }
    counts
}

/// The `type` tag of one record. Missing or `null` values map to [`UNKNOWN_TYPE`];
/// non-string values are rendered as JSON text.
pub fn type_tag(meta: Option<&RecordMetadata>) -> String {
    match meta.and_then(|m| m.get("type")) {
        None | Some(serde_json::Value::Null) => UNKNOWN_TYPE.to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
