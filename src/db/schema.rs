//! Tables of the Chroma persistent store that memguard reads.
//!
//! A Chroma data directory holds `chroma.sqlite3`. Collections are named rows in
//! `collections`; each collection owns a `METADATA` segment whose `embeddings`
//! rows are the records, and each record's metadata is spread over
//! `embedding_metadata` as one typed row per key. The document text itself is
//! stored there too, under the reserved `chroma:document` key.
//!
//! memguard only ever reads a store. [`init_schema`] creates the subset of the
//! layout memguard depends on, for test fixtures. All DDL uses `IF NOT EXISTS`.

use rusqlite::Connection;

/// Tables that must be present for a file to be read as a store.
pub const REQUIRED_TABLES: &[&str] = &["collections", "segments", "embeddings", "embedding_metadata"];

/// Prefix of metadata keys the store reserves for itself.
pub const RESERVED_KEY_PREFIX: &str = "chroma:";

/// Key under which the store keeps a record's document text.
pub const DOCUMENT_KEY: &str = "chroma:document";

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS tenants (
    id TEXT PRIMARY KEY,
    UNIQUE (id)
);

CREATE TABLE IF NOT EXISTS databases (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    tenant_id TEXT NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    UNIQUE (tenant_id, name)
);

CREATE TABLE IF NOT EXISTS collections (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    dimension INTEGER,
    database_id TEXT NOT NULL REFERENCES databases(id) ON DELETE CASCADE,
    config_json_str TEXT,
    UNIQUE (name, database_id)
);

CREATE TABLE IF NOT EXISTS segments (
    id TEXT PRIMARY KEY,
    type TEXT NOT NULL,
    scope TEXT NOT NULL,
    collection TEXT REFERENCES collections(id) NOT NULL
);

CREATE TABLE IF NOT EXISTS embeddings (
    id INTEGER PRIMARY KEY,
    segment_id TEXT NOT NULL,
    embedding_id TEXT NOT NULL,
    seq_id BLOB NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (segment_id, embedding_id)
);

-- One row per metadata key; exactly one *_value column is set
CREATE TABLE IF NOT EXISTS embedding_metadata (
    id INTEGER REFERENCES embeddings(id),
    key TEXT NOT NULL,
    string_value TEXT,
    int_value INTEGER,
    float_value REAL,
    bool_value INTEGER,
    PRIMARY KEY (id, key)
);

CREATE INDEX IF NOT EXISTS embedding_metadata_string_value ON embedding_metadata (key, string_value)
    WHERE string_value IS NOT NULL;

INSERT OR IGNORE INTO tenants (id) VALUES ('default_tenant');
INSERT OR IGNORE INTO databases (id, name, tenant_id)
    VALUES ('00000000-0000-0000-0000-000000000000', 'default_database', 'default_tenant');
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

/// Names from [`REQUIRED_TABLES`] that `conn` does not have.
pub fn missing_tables(conn: &Connection) -> rusqlite::Result<Vec<&'static str>> {
    let mut stmt =
        conn.prepare("SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)")?;
    let mut missing = Vec::new();
    for table in REQUIRED_TABLES {
        let present: bool = stmt.query_row([table], |row| row.get(0))?;
        if !present {
            missing.push(*table);
        }
    }
    Ok(missing)
}
