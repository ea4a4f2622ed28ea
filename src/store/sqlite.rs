use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Number, Value};
use std::path::Path;
use tracing::info;

use super::{Collection, MemoryStore, RecordMetadata, StoreError};
use crate::db::{self, schema};

/// Store backed by `<data_dir>/chroma.sqlite3`.
///
/// A data directory without a database file behaves as an empty store: every
/// collection is reported as missing and nothing is created on disk. A database
/// file that lacks the store's tables is rejected with
/// [`StoreError::Unrecognized`].
#[derive(Debug)]
pub struct SqliteStore {
    conn: Option<Connection>,
}

impl SqliteStore {
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let path = data_dir.join(db::STORE_FILE_NAME);
        if !path.exists() {
            info!(path = %path.display(), "no store database yet, treating as empty");
            return Ok(Self { conn: None });
        }

        let unreachable = |e: rusqlite::Error| StoreError::Unreachable {
            path: path.clone(),
            reason: e.to_string(),
        };
        let conn = db::open_read_only(&path).map_err(unreachable)?;
        let missing = schema::missing_tables(&conn).map_err(unreachable)?;
        if !missing.is_empty() {
            return Err(StoreError::Unrecognized { path, missing });
        }
        Ok(Self { conn: Some(conn) })
    }
}

impl MemoryStore for SqliteStore {
    fn collection_exists(&self, name: &str) -> Result<bool, StoreError> {
        let Some(conn) = &self.conn else {
            return Ok(false);
        };
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM collections WHERE name = ?1)",
            [name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn open_collection(&self, name: &str) -> Result<Box<dyn Collection + '_>, StoreError> {
        let conn = self
            .conn
            .as_ref()
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))?;
        let id: String = conn
            .query_row(
                "SELECT id FROM collections WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))?;

        Ok(Box::new(SqliteCollection { conn, id }))
    }
}

struct SqliteCollection<'c> {
    conn: &'c Connection,
    id: String,
}

/// One typed `embedding_metadata` cell.
struct MetadataCell {
    key: Option<String>,
    string_value: Option<String>,
    int_value: Option<i64>,
    float_value: Option<f64>,
    bool_value: Option<bool>,
}

impl Collection for SqliteCollection<'_> {
    fn metadata(&self, limit: usize) -> Result<Vec<Option<RecordMetadata>>, StoreError> {
        // Page the records first so the limit counts records, not metadata rows.
        let mut stmt = self.conn.prepare(
            "WITH page AS (
                 SELECT e.id FROM embeddings e
                 JOIN segments s ON s.id = e.segment_id
                 WHERE s.collection = ?1 AND s.scope = 'METADATA'
                 ORDER BY e.id
                 LIMIT ?2
             )
             SELECT page.id, m.key, m.string_value, m.int_value, m.float_value, m.bool_value
             FROM page
             LEFT JOIN embedding_metadata m ON m.id = page.id
             ORDER BY page.id, m.key",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![self.id, limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                MetadataCell {
                    key: row.get(1)?,
                    string_value: row.get(2)?,
                    int_value: row.get(3)?,
                    float_value: row.get(4)?,
                    bool_value: row.get(5)?,
                },
            ))
        })?;

        let mut entries: Vec<Option<RecordMetadata>> = Vec::new();
        let mut current: Option<i64> = None;
        for row in rows {
            let (record, mut cell) = row?;
            if current != Some(record) {
                current = Some(record);
                entries.push(None);
            }
            let Some(key) = cell.key.take() else {
                continue;
            };
            if key.starts_with(schema::RESERVED_KEY_PREFIX) {
                continue;
            }
            if let Some(meta) = entries.last_mut() {
                meta.get_or_insert_with(RecordMetadata::new)
                    .insert(key, cell.into_value());
            }
        }
        Ok(entries)
    }
}

impl MetadataCell {
    fn into_value(self) -> Value {
        if let Some(s) = self.string_value {
            Value::String(s)
        } else if let Some(i) = self.int_value {
            Value::from(i)
        } else if let Some(f) = self.float_value {
            Number::from_f64(f).map_or(Value::Null, Value::Number)
        } else if let Some(b) = self.bool_value {
            Value::Bool(b)
        } else {
            Value::Null
        }
    }
}
