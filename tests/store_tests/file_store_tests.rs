//! Tests for FileStore
//!
//! These tests verify:
//! - Directory creation and open options
//! - Flush policies
//! - Persistence across reopen (close and drop)
//! - Corrupted or stale files on open

use std::fs;

use fieldkv::config::{Config, FlushPolicy};
use fieldkv::store::{FileStore, OrderedStore, StoreIterator};
use fieldkv::FieldKvError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn config_with_policy(temp_dir: &TempDir, policy: FlushPolicy) -> Config {
    Config::builder()
        .data_dir(temp_dir.path().join("db"))
        .flush_policy(policy)
        .build()
}

fn collect_entries(store: &FileStore) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut iter = store.new_iterator().unwrap();
    let mut entries = Vec::new();
    iter.seek_to_first();
    while iter.valid() {
        entries.push((iter.key().to_vec(), iter.value().to_vec()));
        iter.next();
    }
    entries
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("mydb");

    let store = FileStore::open(Config::builder().data_dir(&data_dir).build()).unwrap();

    assert!(data_dir.exists());
    assert!(store.is_empty());
    assert_eq!(store.data_dir(), data_dir.as_path());
    assert_eq!(store.table_path(), data_dir.join("records.tbl").as_path());
}

#[test]
fn test_open_missing_dir_without_create() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path().join("absent"))
        .create_if_missing(false)
        .build();

    let result = FileStore::open(config);
    assert!(matches!(result, Err(FieldKvError::Config(_))));
}

#[test]
fn test_open_existing_with_error_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("db");

    let store = FileStore::open_path(&data_dir).unwrap();
    store.put(b"a", b"1").unwrap();
    store.close().unwrap();

    let config = Config::builder()
        .data_dir(&data_dir)
        .error_if_exists(true)
        .build();
    assert!(matches!(FileStore::open(config), Err(FieldKvError::Config(_))));
}

#[test]
fn test_open_removes_stale_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("db");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("records.tbl.tmp"), b"half-written").unwrap();

    let store = FileStore::open_path(&data_dir).unwrap();

    assert!(store.is_empty());
    assert!(!data_dir.join("records.tbl.tmp").exists());
}

#[test]
fn test_refused_open_leaves_directory_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("db");

    let store = FileStore::open_path(&data_dir).unwrap();
    store.put(b"a", b"1").unwrap();
    store.close().unwrap();
    fs::write(data_dir.join("records.tbl.tmp"), b"half-written").unwrap();

    let config = Config::builder()
        .data_dir(&data_dir)
        .error_if_exists(true)
        .build();
    assert!(matches!(FileStore::open(config), Err(FieldKvError::Config(_))));
    assert!(data_dir.join("records.tbl.tmp").exists());
}

#[test]
fn test_open_keeps_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_with_policy(&temp_dir, FlushPolicy::OnClose);

    let store = FileStore::open(config.clone()).unwrap();

    assert_eq!(store.config().flush_policy, FlushPolicy::OnClose);
    assert_eq!(store.config().data_dir, config.data_dir);
}

#[test]
fn test_open_corrupted_table() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("db");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("records.tbl"), b"definitely not a table file").unwrap();

    let result = FileStore::open_path(&data_dir);
    assert!(matches!(result, Err(FieldKvError::TableCorruption(_))));
}

// =============================================================================
// Flush Policy Tests
// =============================================================================

#[test]
fn test_every_write_policy() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::open(config_with_policy(&temp_dir, FlushPolicy::EveryWrite)).unwrap();

    store.put(b"a", b"1").unwrap();

    assert!(store.table_path().exists());
    assert_eq!(store.unflushed_writes(), 0);
}

#[test]
fn test_every_n_writes_policy() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::open(config_with_policy(
        &temp_dir,
        FlushPolicy::EveryNWrites { count: 3 },
    ))
    .unwrap();

    store.put(b"a", b"1").unwrap();
    store.put(b"b", b"2").unwrap();
    assert_eq!(store.unflushed_writes(), 2);
    assert!(!store.table_path().exists());

    store.put(b"c", b"3").unwrap();
    assert_eq!(store.unflushed_writes(), 0);
    assert!(store.table_path().exists());
}

#[test]
fn test_on_close_policy_defers_until_flush() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::open(config_with_policy(&temp_dir, FlushPolicy::OnClose)).unwrap();

    for i in 0..50u32 {
        store.put(&i.to_be_bytes(), b"v").unwrap();
    }
    assert_eq!(store.unflushed_writes(), 50);
    assert!(!store.table_path().exists());

    store.flush().unwrap();
    assert_eq!(store.unflushed_writes(), 0);
    assert!(store.table_path().exists());
}

#[test]
fn test_failed_flush_rolls_back_new_key() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::open(config_with_policy(&temp_dir, FlushPolicy::EveryWrite)).unwrap();

    fs::remove_dir_all(store.data_dir()).unwrap();

    assert!(matches!(store.put(b"k", b"v"), Err(FieldKvError::Io(_))));
    assert!(matches!(store.get(b"k"), Err(FieldKvError::KeyNotFound)));
    assert!(collect_entries(&store).is_empty());
    assert_eq!(store.unflushed_writes(), 0);
}

#[test]
fn test_failed_flush_restores_previous_value() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::open(config_with_policy(&temp_dir, FlushPolicy::EveryWrite)).unwrap();
    store.put(b"k", b"v1").unwrap();

    fs::remove_dir_all(store.data_dir()).unwrap();

    assert!(store.put(b"k", b"v2").is_err());
    assert_eq!(store.get(b"k").unwrap(), b"v1".to_vec());
    assert_eq!(store.len(), 1);
    assert_eq!(store.unflushed_writes(), 0);
}

#[test]
fn test_failed_flush_keeps_earlier_pending_writes() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::open(config_with_policy(
        &temp_dir,
        FlushPolicy::EveryNWrites { count: 2 },
    ))
    .unwrap();
    store.put(b"a", b"1").unwrap();

    fs::remove_dir_all(store.data_dir()).unwrap();

    assert!(store.put(b"b", b"2").is_err());
    assert_eq!(store.get(b"a").unwrap(), b"1".to_vec());
    assert!(store.get(b"b").is_err());
    assert_eq!(store.unflushed_writes(), 1);

    // Pending write from the successful put still reaches disk
    fs::create_dir_all(store.data_dir()).unwrap();
    store.flush().unwrap();
    assert_eq!(store.unflushed_writes(), 0);
    assert!(store.table_path().exists());
}

#[test]
fn test_failed_close_is_not_retried_on_drop() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_with_policy(&temp_dir, FlushPolicy::OnClose);

    let store = FileStore::open(config.clone()).unwrap();
    store.put(b"k", b"v").unwrap();
    // A directory where the temp file goes makes every flush fail
    fs::create_dir_all(config.data_dir.join("records.tbl.tmp")).unwrap();

    assert!(store.close().is_err());
    assert!(!config.data_dir.join("records.tbl").exists());
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_close_and_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_with_policy(&temp_dir, FlushPolicy::OnClose);

    let store = FileStore::open(config.clone()).unwrap();
    store.put(b"k2", b"two").unwrap();
    store.put(b"k1", b"one").unwrap();
    store.put(b"k1", b"uno").unwrap();
    store.close().unwrap();

    let store = FileStore::open(config).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(b"k1").unwrap(), b"uno".to_vec());
    assert_eq!(
        collect_entries(&store),
        vec![
            (b"k1".to_vec(), b"uno".to_vec()),
            (b"k2".to_vec(), b"two".to_vec()),
        ]
    );
}

#[test]
fn test_drop_flushes_pending_writes() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_with_policy(&temp_dir, FlushPolicy::OnClose);

    {
        let store = FileStore::open(config.clone()).unwrap();
        store.put(b"key", b"value").unwrap();
    }

    let store = FileStore::open(config).unwrap();
    assert_eq!(store.get(b"key").unwrap(), b"value".to_vec());
}

#[test]
fn test_reopen_missing_key() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_with_policy(&temp_dir, FlushPolicy::EveryWrite);

    let store = FileStore::open(config.clone()).unwrap();
    store.put(b"present", b"1").unwrap();
    drop(store);

    let store = FileStore::open(config).unwrap();
    assert!(matches!(store.get(b"absent"), Err(FieldKvError::KeyNotFound)));
}

#[test]
fn test_flush_empty_store_writes_empty_table() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_with_policy(&temp_dir, FlushPolicy::OnClose);

    let store = FileStore::open(config.clone()).unwrap();
    store.flush().unwrap();
    drop(store);

    let store = FileStore::open(config).unwrap();
    assert!(store.is_empty());
}
