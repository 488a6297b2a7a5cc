//! Integration tests exercising the store through real files.

#![allow(clippy::expect_used)]

use std::fs;

use cardfile_store::table::TABLE_BLOCK_SIZE;
use cardfile_store::{OpenMode, RecordStore, StoreError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn persisted_records_survive_reopen() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("cards.db");

    let mut store = RecordStore::open(&path, OpenMode::Create).expect("create");
    store.set(0, "Alice", "a@x.com").expect("set");
    store.set(42, "Bob", "b@x.com").expect("set");
    store.persist().expect("persist");
    store.close().expect("close");

    let reopened = RecordStore::open(&path, OpenMode::Update).expect("reopen");
    let alice = reopened.get(0).expect("get 0");
    assert!(alice.occupied);
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.email, "a@x.com");

    let ids: Vec<u32> = reopened.records().map(|record| record.id).collect();
    assert_eq!(ids, vec![0, 42]);
}

#[test]
fn delete_then_persist_round_trips_as_empty() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("cards.db");

    let mut store = RecordStore::open(&path, OpenMode::Create).expect("create");
    store.set(7, "Eve", "e@x.com").expect("set");
    store.persist().expect("persist");
    store.delete(7).expect("delete");
    store.persist().expect("persist delete");
    store.close().expect("close");

    let reopened = RecordStore::open(&path, OpenMode::Update).expect("reopen");
    assert!(matches!(reopened.get(7), Err(StoreError::NotSet { id: 7 })));
    assert_eq!(reopened.records().count(), 0);
}

#[test]
fn file_size_is_exactly_one_block() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("cards.db");

    let mut store = RecordStore::open(&path, OpenMode::Create).expect("create");
    store.persist().expect("persist");
    store.close().expect("close");

    let len = fs::metadata(&path).expect("metadata").len();
    assert_eq!(len, TABLE_BLOCK_SIZE as u64);
}

#[test]
fn update_mode_rejects_short_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("short.db");
    fs::write(&path, vec![0u8; TABLE_BLOCK_SIZE / 2]).expect("write short file");

    let err = RecordStore::open(&path, OpenMode::Update).expect_err("short file");
    assert!(matches!(
        err,
        StoreError::TruncatedTable { got, expected }
            if got == TABLE_BLOCK_SIZE / 2 && expected == TABLE_BLOCK_SIZE
    ));
}

#[test]
fn update_mode_rejects_foreign_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("foreign.db");
    fs::write(&path, vec![0xFFu8; TABLE_BLOCK_SIZE]).expect("write foreign file");

    let err = RecordStore::open(&path, OpenMode::Update).expect_err("foreign file");
    assert!(matches!(err, StoreError::BadMagic { .. }));
}

#[test]
fn create_mode_truncates_existing_content() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("cards.db");

    let mut store = RecordStore::open(&path, OpenMode::Create).expect("create");
    store.set(1, "Alice", "a@x.com").expect("set");
    store.persist().expect("persist");
    store.close().expect("close");

    // Re-creating starts from an all-unoccupied table.
    let mut fresh = RecordStore::open(&path, OpenMode::Create).expect("re-create");
    assert_eq!(fresh.records().count(), 0);
    fresh.persist().expect("persist");
    fresh.close().expect("close");

    let reopened = RecordStore::open(&path, OpenMode::Update).expect("reopen");
    assert!(matches!(reopened.get(1), Err(StoreError::NotSet { id: 1 })));
}

#[test]
fn truncated_fields_persist_with_terminator() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("cards.db");
    let long_name = "n".repeat(2000);

    let mut store = RecordStore::open(&path, OpenMode::Create).expect("create");
    store.set(0, &long_name, "a@x.com").expect("set");
    store.persist().expect("persist");
    store.close().expect("close");

    let reopened = RecordStore::open(&path, OpenMode::Update).expect("reopen");
    let record = reopened.get(0).expect("get");
    assert_eq!(record.name, "n".repeat(cardfile_store::FIELD_SIZE - 1));
    assert_eq!(record.email, "a@x.com");
}
