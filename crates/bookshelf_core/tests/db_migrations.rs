use bookshelf_core::db::migrations::latest_version;
use bookshelf_core::db::{open_db, open_db_in_memory, DbError};
use bookshelf_core::{
    backend_for, BookService, DatabaseUrl, InMemoryBookRepository, NewBook, PersistenceBackend,
    SqliteBackend,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "books");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookshelf.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "books");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sqlite_backend_connects_and_disconnects() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = SqliteBackend::file(dir.path().join("backend.db"));

    backend.connect().unwrap();
    backend.connect().unwrap();
    assert!(backend.is_connected());
    assert_table_exists(backend.connection().unwrap(), "books");

    backend.disconnect().unwrap();
    assert!(!backend.is_connected());
    backend.disconnect().unwrap();
}

#[test]
fn sqlite_backend_reports_unsupported_schema_on_connect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 7;")
        .unwrap();

    let mut backend = backend_for(&DatabaseUrl::Sqlite(path));
    assert!(backend.connect().is_err());
    assert!(!backend.is_connected());
}

#[test]
fn catalog_operations_never_touch_the_backend() {
    let mut backend = SqliteBackend::in_memory();
    backend.connect().unwrap();

    let service = BookService::new(InMemoryBookRepository::seeded());
    service.create_book(NewBook::new("New Book", "New Author"));
    service.delete_book("1").unwrap();

    let rows: i64 = backend
        .connection()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM books;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
