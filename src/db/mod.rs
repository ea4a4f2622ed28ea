pub mod schema;

use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;

/// File name of the store database inside its data directory.
pub const STORE_FILE_NAME: &str = "chroma.sqlite3";

/// Open an existing store database without the ability to modify it.
///
/// The connection is opened read-only and additionally pinned with
/// `PRAGMA query_only`, so nothing issued through it can reset or rewrite data.
/// The schema is touched once so a file that is not a SQLite database fails here
/// rather than on the first real query.
pub fn open_read_only(path: impl AsRef<Path>) -> rusqlite::Result<Connection> {
    let path = path.as_ref();

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI,
    )?;
    conn.busy_timeout(Duration::from_millis(5000))?;
    conn.pragma_update(None, "query_only", true)?;
    conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))?;

    tracing::debug!(path = %path.display(), "store opened read-only");
    Ok(conn)
}
