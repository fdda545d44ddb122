//! Field Store Facade
//!
//! Record-level `put` / `get` over any [`OrderedStore`]. Store errors pass
//! through untouched; decode failures surface as `MalformedRecord`.

use std::ops::ControlFlow;

use crate::config::Config;
use crate::error::Result;
use crate::query::{self, MalformedPolicy, ScanQuery, ScanStats};
use crate::record::{decode, encode, Record};
use crate::store::{FileStore, Key, OrderedStore};

/// Encode `record` and store it under `key`, replacing any existing value
pub fn put<S: OrderedStore + ?Sized>(store: &S, key: &[u8], record: &Record) -> Result<()> {
    let bytes = encode(record)?;
    store.put(key, &bytes)?;
    tracing::debug!(
        "Stored {} fields ({} bytes) under {:?}",
        record.len(),
        bytes.len(),
        String::from_utf8_lossy(key)
    );
    Ok(())
}

/// Read and decode the record under `key`
///
/// Returns `Err(KeyNotFound)` if the key is absent.
pub fn get<S: OrderedStore + ?Sized>(store: &S, key: &[u8]) -> Result<Record> {
    let bytes = store.get(key)?;
    decode(&bytes)
}

/// A store handle bundled with the record operations and scan policy
pub struct FieldStore<S> {
    store: S,
    policy: MalformedPolicy,
}

impl<S: OrderedStore> FieldStore<S> {
    /// Wrap a store, skipping malformed values during scans
    pub fn new(store: S) -> Self {
        Self::with_policy(store, MalformedPolicy::default())
    }

    pub fn with_policy(store: S, policy: MalformedPolicy) -> Self {
        Self { store, policy }
    }

    /// See [`put`]
    pub fn put(&self, key: &[u8], record: &Record) -> Result<()> {
        put(&self.store, key, record)
    }

    /// See [`get`]
    pub fn get(&self, key: &[u8]) -> Result<Record> {
        get(&self.store, key)
    }

    /// Keys of all records with a field `name` equal to `value`, ascending
    pub fn find_keys_by_field(&self, name: &[u8], value: &[u8]) -> Result<Vec<Key>> {
        let outcome = ScanQuery::new(name, value)
            .policy(self.policy)
            .run(&self.store)?;
        Ok(outcome.keys)
    }

    /// Visit every record in key order
    pub fn scan<F>(&self, visit: F) -> Result<ScanStats>
    where
        F: FnMut(&[u8], &Record) -> ControlFlow<()>,
    {
        query::scan(&self.store, self.policy, visit)
    }

    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl FieldStore<FileStore> {
    /// Open a file-backed store, taking the scan policy from `config`
    pub fn open(config: Config) -> Result<Self> {
        let policy = config.malformed_policy;
        Ok(Self::with_policy(FileStore::open(config)?, policy))
    }
}
