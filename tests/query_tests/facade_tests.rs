//! Facade Tests
//!
//! Tests for record-level put/get over an ordered store.

use fieldkv::facade::{self, FieldStore};
use fieldkv::store::{MemStore, OrderedStore, SnapshotIterator};
use fieldkv::{FieldKvError, Record, Result};

// =============================================================================
// Helper Functions
// =============================================================================

fn customer(n: u32) -> Record {
    Record::new()
        .with_field("name", format!("Customer#{:09}", n))
        .with_field("phone", "12-345-678-9012")
}

/// A store whose reads and writes always fail
struct FailingStore;

impl OrderedStore for FailingStore {
    type Iter<'a> = SnapshotIterator;

    fn put(&self, _key: &[u8], _value: &[u8]) -> Result<()> {
        Err(FieldKvError::Storage("disk full".to_string()))
    }

    fn get(&self, _key: &[u8]) -> Result<Vec<u8>> {
        Err(FieldKvError::Storage("read failed".to_string()))
    }

    fn new_iterator(&self) -> Result<Self::Iter<'_>> {
        Err(FieldKvError::Storage("no iterator".to_string()))
    }
}

// =============================================================================
// Free Function Tests
// =============================================================================

#[test]
fn test_put_get() {
    let store = MemStore::new();

    facade::put(&store, b"k1", &customer(1)).unwrap();

    assert_eq!(facade::get(&store, b"k1").unwrap(), customer(1));
}

#[test]
fn test_put_stores_encoded_bytes() {
    let store = MemStore::new();
    let record = Record::new().with_field("a", "1");

    facade::put(&store, b"k", &record).unwrap();

    assert_eq!(store.get(b"k").unwrap(), fieldkv::encode(&record).unwrap());
}

#[test]
fn test_get_nonexistent_key() {
    let store = MemStore::new();
    let result = facade::get(&store, b"missing");
    assert!(matches!(result, Err(FieldKvError::KeyNotFound)));
}

#[test]
fn test_put_overwrite() {
    let store = MemStore::new();
    let r1 = customer(1);
    let r2 = customer(2);

    facade::put(&store, b"k1", &r1).unwrap();
    facade::put(&store, b"k1", &r2).unwrap();

    assert_eq!(facade::get(&store, b"k1").unwrap(), r2);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_put_get_empty_record() {
    let store = MemStore::new();
    facade::put(&store, b"empty", &Record::new()).unwrap();
    assert!(facade::get(&store, b"empty").unwrap().is_empty());
}

#[test]
fn test_get_malformed_value() {
    let store = MemStore::new();
    store.put(b"bad", &[5, 0, 0, 0, 1]).unwrap();

    let result = facade::get(&store, b"bad");
    assert!(matches!(result, Err(FieldKvError::MalformedRecord(_))));
}

#[test]
fn test_store_errors_pass_through() {
    let put_err = facade::put(&FailingStore, b"k", &customer(1)).unwrap_err();
    assert!(matches!(put_err, FieldKvError::Storage(ref msg) if msg == "disk full"));

    let get_err = facade::get(&FailingStore, b"k").unwrap_err();
    assert!(matches!(get_err, FieldKvError::Storage(ref msg) if msg == "read failed"));
}

// =============================================================================
// FieldStore Tests
// =============================================================================

#[test]
fn test_field_store_roundtrip() {
    let db = FieldStore::new(MemStore::new());

    db.put(b"k_1", &customer(1)).unwrap();
    db.put(b"k_2", &customer(2)).unwrap();

    assert_eq!(db.get(b"k_2").unwrap(), customer(2));
    assert_eq!(db.store().len(), 2);
}

#[test]
fn test_field_store_find() {
    let db = FieldStore::new(MemStore::new());

    db.put(b"k_1", &customer(1)).unwrap();
    db.put(b"k_2", &customer(2)).unwrap();

    let keys = db.find_keys_by_field(b"name", b"Customer#000000002").unwrap();
    assert_eq!(keys, vec![b"k_2".to_vec()]);
}

#[test]
fn test_field_store_into_inner() {
    let db = FieldStore::new(MemStore::new());
    db.put(b"k", &customer(7)).unwrap();

    let store = db.into_inner();
    assert_eq!(facade::get(&store, b"k").unwrap(), customer(7));
}

#[test]
fn test_field_store_scan_error_passes_through() {
    let db = FieldStore::new(FailingStore);
    let result = db.find_keys_by_field(b"name", b"x");
    assert!(matches!(result, Err(FieldKvError::Storage(ref msg)) if msg == "no iterator"));
}
