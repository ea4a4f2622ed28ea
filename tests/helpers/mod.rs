#![allow(dead_code)]

use memguard::db;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::path::Path;

/// Default database id created by the store schema.
pub const DEFAULT_DATABASE: &str = "00000000-0000-0000-0000-000000000000";

/// Create `<dir>/chroma.sqlite3` with the store layout and return a writable connection.
pub fn provision_store(dir: &Path) -> Connection {
    let conn = Connection::open(dir.join(db::STORE_FILE_NAME)).unwrap();
    db::schema::init_schema(&conn).unwrap();
    conn
}

/// Insert a collection with its metadata and vector segments; return the
/// metadata segment id records are attached to.
pub fn create_collection(conn: &Connection, name: &str) -> String {
    let id = format!("col-{name}");
    conn.execute(
        "INSERT INTO collections (id, name, dimension, database_id) VALUES (?1, ?2, 384, ?3)",
        params![id, name, DEFAULT_DATABASE],
    )
    .unwrap();
    let metadata_segment = format!("{id}-metadata");
    conn.execute(
        "INSERT INTO segments (id, type, scope, collection)
         VALUES (?1, 'urn:chroma:segment/metadata/sqlite', 'METADATA', ?2)",
        params![metadata_segment, id],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO segments (id, type, scope, collection)
         VALUES (?1, 'urn:chroma:segment/vector/hnsw-local-persisted', 'VECTOR', ?2)",
        params![format!("{id}-vector"), id],
    )
    .unwrap();
    metadata_segment
}

/// Insert one record with its document and metadata, given as JSON object text
/// (`None` stores no metadata keys).
pub fn insert_record(conn: &Connection, segment: &str, id: &str, metadata: Option<&str>) {
    conn.prepare_cached(
        "INSERT INTO embeddings (segment_id, embedding_id, seq_id) VALUES (?1, ?2, ?3)",
    )
    .unwrap()
    .execute(params![segment, id, id.as_bytes()])
    .unwrap();
    let rowid = conn.last_insert_rowid();

    let mut pairs = vec![(db::schema::DOCUMENT_KEY.to_string(), Value::from(format!("document {id}")))];
    if let Some(raw) = metadata {
        let Value::Object(map) = serde_json::from_str::<Value>(raw).unwrap() else {
            panic!("metadata must be a JSON object: {raw}");
        };
        pairs.extend(map);
    }
    for (key, value) in pairs {
        conn.prepare_cached(
            "INSERT INTO embedding_metadata (id, key, string_value, int_value, float_value, bool_value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .unwrap()
        .execute(params![
            rowid,
            key,
            value.as_str(),
            value.as_i64(),
            value.as_f64().filter(|_| !value.is_i64()),
            value.as_bool()
        ])
        .unwrap();
    }
}

/// Write a `.mcp.json` whose `chroma` server points `--data-dir` at `data_dir`.
pub fn write_integration_file(project: &Path, data_dir: &Path) {
    let json = serde_json::json!({
        "mcpServers": {
            "chroma": {
                "command": "uvx",
                "args": ["chroma-mcp", "--client-type", "persistent", "--data-dir", data_dir]
            }
        }
    });
    std::fs::write(project.join(".mcp.json"), json.to_string()).unwrap();
}
