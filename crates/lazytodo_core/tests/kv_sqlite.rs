use lazytodo_core::db::migrations::latest_version;
use lazytodo_core::db::{open_db, open_db_in_memory, DbError};
use lazytodo_core::{
    KeyValueStore, KvError, SqliteKeyValueStore, TodoFactory, TodoStore, DEFAULT_STORAGE_KEY,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    SqliteKeyValueStore::try_new(&conn).unwrap();
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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
fn kv_store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteKeyValueStore::try_new(&conn) {
        Err(KvError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn kv_store_rejects_connection_without_kv_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteKeyValueStore::try_new(&conn),
        Err(KvError::MissingRequiredTable("kv_entries"))
    ));
}

#[test]
fn kv_store_upserts_single_row_per_key() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();

    assert_eq!(kv.get("todos").unwrap(), None);
    kv.set("todos", "[]").unwrap();
    kv.set("todos", "[1]").unwrap();

    assert_eq!(kv.get("todos").unwrap().as_deref(), Some("[1]"));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn todo_collection_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lazytodo.sqlite3");
    let todo = TodoFactory::create("A", "B", "2099-01-01").unwrap();

    {
        let conn = open_db(&path).unwrap();
        let store = TodoStore::new(SqliteKeyValueStore::try_new(&conn).unwrap());
        store.append(todo.clone()).unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    assert!(kv.get(DEFAULT_STORAGE_KEY).unwrap().is_some());

    let store = TodoStore::new(kv);
    assert_eq!(store.load_all().unwrap(), vec![todo]);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
