//! Unit tests for the key-value storage backends.

use linkstash::storage::{KeyValueStorage, MemoryStorage, SqliteStorage};
use rstest::rstest;

#[rstest]
#[case::memory(Box::new(MemoryStorage::new()))]
#[case::sqlite(Box::new(SqliteStorage::open_in_memory().unwrap()))]
fn test_set_get_remove(#[case] storage: Box<dyn KeyValueStorage>) {
    assert!(storage.get("missing").is_none());

    storage.set("accessToken", "abc");
    assert_eq!(storage.get("accessToken").as_deref(), Some("abc"));

    storage.set("accessToken", "def");
    assert_eq!(storage.get("accessToken").as_deref(), Some("def"));

    storage.remove("accessToken");
    assert!(storage.get("accessToken").is_none());

    // Removing an absent key is a no-op
    storage.remove("accessToken");
}

#[test]
fn test_sqlite_storage_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.db");

    {
        let storage = SqliteStorage::open(&path).unwrap();
        storage.set("refreshToken", "persisted");
    }

    let storage = SqliteStorage::open(&path).unwrap();
    assert_eq!(storage.get("refreshToken").as_deref(), Some("persisted"));
}

#[test]
fn test_sqlite_storage_open_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.db");

    let first = SqliteStorage::open(&path).unwrap();
    first.set("k", "v");
    drop(first);

    // Re-opening runs the schema init again without clobbering data.
    let second = SqliteStorage::open(&path).unwrap();
    assert_eq!(second.get("k").as_deref(), Some("v"));
}

#[test]
fn test_values_are_stored_verbatim() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let blob = r#"{"bookmarks":[{"id":"b1","title":"quote \" and emoji 🦀"}]}"#;
    storage.set("linkstash-storage", blob);
    assert_eq!(storage.get("linkstash-storage").as_deref(), Some(blob));
}
