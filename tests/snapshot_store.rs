//! Cleaned table snapshots in SQLite

mod common;

use chatscope::{OpenStore, Pipeline, SnapshotStore, SqliteStore, StorageError};
use common::{fixture_table, test_config, FIXTURE_CLEANED_ROWS};

#[test]
fn test_snapshot_summary_matches_cleaned_table() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("chatscope.db");

    let output = Pipeline::new(test_config()).unwrap().run(&fixture_table()).unwrap();
    let store = SqliteStore::open(&db_path).unwrap();
    let saved = store.save_snapshot(&output.prepared.cleaned).unwrap();
    assert_eq!(saved, FIXTURE_CLEANED_ROWS);

    let summary = store.summary().unwrap();
    assert_eq!(summary.total_messages, FIXTURE_CLEANED_ROWS as u64);
    assert_eq!(summary.distinct_users, Some(4));
    assert_eq!(summary.distinct_groups, Some(3));
    assert_eq!(summary.text_only, Some(3));
    assert_eq!(summary.with_media, Some(2));
}

#[test]
fn test_snapshot_columns_use_canonical_names() {
    let output = Pipeline::new(test_config()).unwrap().run(&fixture_table()).unwrap();
    let store = SqliteStore::open_in_memory().unwrap();
    store.save_snapshot(&output.prepared.cleaned).unwrap();

    let columns = store.snapshot_columns().unwrap();
    assert_eq!(columns, output.prepared.cleaned.columns());
    assert!(columns.iter().any(|c| c == "author"));
    assert!(!columns.iter().any(|c| c == "id_member_anonymous"));
    assert_eq!(columns.last().map(String::as_str), Some("sentiment"));
}

#[test]
fn test_summary_without_snapshot() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(matches!(store.summary(), Err(StorageError::NoSnapshot)));
}
