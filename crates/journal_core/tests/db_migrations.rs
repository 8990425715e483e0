use journal_core::db::migrations::latest_version;
use journal_core::db::{
    open_content_db, open_content_db_in_memory, open_metadata_db, open_metadata_db_in_memory,
    DbError, StoreSchema,
};
use rusqlite::Connection;

#[test]
fn metadata_store_in_memory_applies_all_migrations() {
    let conn = open_metadata_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version(StoreSchema::Metadata));
    assert_table_exists(&conn, "entries");
    assert_index_exists(&conn, "idx_entries_title");
}

#[test]
fn content_store_in_memory_applies_all_migrations() {
    let conn = open_content_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version(StoreSchema::Content));
    assert_table_exists(&conn, "documents");
}

#[test]
fn stores_keep_separate_schemas() {
    let metadata = open_metadata_db_in_memory().unwrap();
    let content = open_content_db_in_memory().unwrap();

    assert_table_missing(&metadata, "documents");
    assert_table_missing(&content, "entries");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal_meta.sqlite3");

    let conn_first = open_metadata_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO entries (title, type) VALUES ('kept', 'TEXT');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_metadata_db(&path).unwrap();
    assert_eq!(
        schema_version(&conn_second),
        latest_version(StoreSchema::Metadata)
    );
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store").join("content.sqlite3");

    let conn = open_content_db(&path).unwrap();
    assert_table_exists(&conn, "documents");
    assert!(path.exists());
}

#[test]
fn entry_type_column_rejects_unknown_values() {
    let conn = open_metadata_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO entries (title, type) VALUES ('bad', 'AUDIO');",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_content_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version(StoreSchema::Content));
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn sqlite_object_exists(conn: &Connection, kind: &str, name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert!(
        sqlite_object_exists(conn, "table", table_name),
        "table {table_name} does not exist"
    );
}

fn assert_table_missing(conn: &Connection, table_name: &str) {
    assert!(
        !sqlite_object_exists(conn, "table", table_name),
        "table {table_name} should not exist"
    );
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert!(
        sqlite_object_exists(conn, "index", index_name),
        "index {index_name} does not exist"
    );
}
