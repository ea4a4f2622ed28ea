mod helpers;

use memguard::stats::{self, ReportStatus, MAX_RECORDS};
use tempfile::TempDir;

#[test]
fn counts_types_in_sqlite_store() {
    let tmp = TempDir::new().unwrap();
    let conn = helpers::provision_store(tmp.path());
    let id = helpers::create_collection(&conn, "project_memory");
    helpers::insert_record(&conn, &id, "m1", Some(r#"{"type":"fact"}"#));
    helpers::insert_record(&conn, &id, "m2", Some(r#"{"type":"fact","source":"chat"}"#));
    helpers::insert_record(&conn, &id, "m3", Some("{}"));
    drop(conn);

    let report = stats::report("project_memory", tmp.path());
    assert_eq!(report.status, ReportStatus::Success);
    assert_eq!(report.total, 3);
    assert_eq!(report.by_type["fact"], 2);
    assert_eq!(report.by_type["unknown"], 1);
}

#[test]
fn other_collections_are_not_counted() {
    let tmp = TempDir::new().unwrap();
    let conn = helpers::provision_store(tmp.path());
    let mine = helpers::create_collection(&conn, "project_memory");
    let other = helpers::create_collection(&conn, "scratch");
    helpers::insert_record(&conn, &mine, "a", Some(r#"{"type":"decision"}"#));
    helpers::insert_record(&conn, &other, "b", Some(r#"{"type":"fact"}"#));
    helpers::insert_record(&conn, &other, "c", None);
    drop(conn);

    let report = stats::report("project_memory", tmp.path());
    assert_eq!(report.total, 1);
    assert_eq!(report.by_type.len(), 1);
    assert_eq!(report.by_type["decision"], 1);
}

#[test]
fn null_metadata_counts_as_unknown() {
    let tmp = TempDir::new().unwrap();
    let conn = helpers::provision_store(tmp.path());
    let id = helpers::create_collection(&conn, "project_memory");
    helpers::insert_record(&conn, &id, "a", None);
    helpers::insert_record(&conn, &id, "b", Some(r#"{"source":"chat"}"#));
    helpers::insert_record(&conn, &id, "c", Some(r#"{"type":null}"#));
    drop(conn);

    let report = stats::report("project_memory", tmp.path());
    assert_eq!(report.status, ReportStatus::Success);
    assert_eq!(report.total, 3);
    assert_eq!(report.by_type["unknown"], 3);
}

#[test]
fn missing_collection_reports_new_collection() {
    let tmp = TempDir::new().unwrap();
    let conn = helpers::provision_store(tmp.path());
    helpers::create_collection(&conn, "scratch");
    drop(conn);

    let report = stats::report("project_memory", tmp.path());
    assert_eq!(report.status, ReportStatus::NewCollection);
    assert_eq!(report.total, 0);
    assert!(report.by_type.is_empty());
    assert!(report.error.is_none());
}

#[test]
fn empty_data_dir_reports_new_collection_without_creating_files() {
    let tmp = TempDir::new().unwrap();
    let data_dir = tmp.path().join(".store");

    let report = stats::report("project_memory", &data_dir);
    assert_eq!(report.status, ReportStatus::NewCollection);
    assert!(!data_dir.exists());
}

#[test]
fn corrupt_store_reports_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join(memguard::db::STORE_FILE_NAME),
        vec![b'x'; 4096],
    )
    .unwrap();

    let report = stats::report("project_memory", tmp.path());
    assert_eq!(report.status, ReportStatus::Error);
    assert_eq!(report.total, 0);
    assert!(report.by_type.is_empty());
    assert!(report.error.is_some());
}

#[test]
fn foreign_sqlite_file_reports_error_not_new_collection() {
    let tmp = TempDir::new().unwrap();
    let conn = rusqlite::Connection::open(tmp.path().join(memguard::db::STORE_FILE_NAME)).unwrap();
    conn.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)")
        .unwrap();
    drop(conn);

    let report = stats::report("project_memory", tmp.path());
    assert_eq!(report.status, ReportStatus::Error);
    assert_eq!(report.total, 0);
    assert!(report.error.unwrap().contains("not a memory store"));
}

#[test]
fn report_never_modifies_the_store() {
    let tmp = TempDir::new().unwrap();
    let conn = helpers::provision_store(tmp.path());
    let id = helpers::create_collection(&conn, "project_memory");
    helpers::insert_record(&conn, &id, "a", Some(r#"{"type":"fact"}"#));

    let first = stats::report("project_memory", tmp.path());
    let second = stats::report("project_memory", tmp.path());
    assert_eq!(first, second);

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM embeddings", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn total_never_exceeds_cap() {
    let tmp = TempDir::new().unwrap();
    let mut conn = helpers::provision_store(tmp.path());
    let id = helpers::create_collection(&conn, "big");

    let tx = conn.transaction().unwrap();
    for i in 0..MAX_RECORDS + 10 {
        let meta = if i % 3 == 0 { r#"{"type":"fact"}"# } else { r#"{"type":"note"}"# };
        helpers::insert_record(&tx, &id, &format!("r{i}"), Some(meta));
    }
    tx.commit().unwrap();
    drop(conn);

    let report = stats::report("big", tmp.path());
    assert_eq!(report.status, ReportStatus::Success);
    assert_eq!(report.total, MAX_RECORDS as u64);
    assert_eq!(report.total, report.by_type.values().sum::<u64>());
}
