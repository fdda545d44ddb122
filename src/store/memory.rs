//! In-memory store
//!
//! BTreeMap-based ordered store with RwLock for concurrency.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::{OrderedStore, StoreIterator};
use crate::error::{FieldKvError, Result};

/// In-memory ordered key-value store
///
/// Many concurrent readers, one writer at a time. Iterators take a
/// point-in-time snapshot, so they never hold the lock.
#[derive(Debug, Default)]
pub struct MemStore {
    /// Sorted entries
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,

    /// Approximate size in bytes (keys + values)
    size: AtomicUsize,
}

impl MemStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from entries, e.g. a loaded table
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        let data: BTreeMap<Vec<u8>, Vec<u8>> = entries.into_iter().collect();
        let size = data.iter().map(|(k, v)| k.len() + v.len()).sum();
        Self {
            data: RwLock::new(data),
            size: AtomicUsize::new(size),
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Approximate size in bytes
    pub fn size(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }

    /// Copy of all entries in ascending key order
    pub fn snapshot(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.data
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Insert an entry, returning the value it replaced
    pub fn insert(&self, key: &[u8], value: &[u8]) -> Option<Vec<u8>> {
        let mut data = self.data.write();
        let old = data.insert(key.to_vec(), value.to_vec());
        match &old {
            Some(old) => {
                self.size.fetch_sub(old.len(), Ordering::Relaxed);
                self.size.fetch_add(value.len(), Ordering::Relaxed);
            }
            None => {
                self.size.fetch_add(key.len() + value.len(), Ordering::Relaxed);
            }
        }
        old
    }

    /// Remove an entry, returning its value
    pub fn remove(&self, key: &[u8]) -> Option<Vec<u8>> {
        let old = self.data.write().remove(key);
        if let Some(old) = &old {
            self.size.fetch_sub(key.len() + old.len(), Ordering::Relaxed);
        }
        old
    }

    /// Remove all entries
    pub fn clear(&self) {
        let mut data = self.data.write();
        data.clear();
        self.size.store(0, Ordering::Relaxed);
    }
}

impl OrderedStore for MemStore {
    type Iter<'a> = SnapshotIterator;

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.insert(key, value);
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.data
            .read()
            .get(key)
            .cloned()
            .ok_or(FieldKvError::KeyNotFound)
    }

    fn new_iterator(&self) -> Result<Self::Iter<'_>> {
        Ok(SnapshotIterator::new(self.snapshot()))
    }
}

/// Iterator over a sorted snapshot of entries
#[derive(Debug)]
pub struct SnapshotIterator {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    /// None until the first seek
    position: Option<usize>,
}

impl SnapshotIterator {
    /// `entries` must already be sorted by key
    pub fn new(entries: Vec<(Vec<u8>, Vec<u8>)>) -> Self {
        Self {
            entries,
            position: None,
        }
    }

    fn current(&self) -> &(Vec<u8>, Vec<u8>) {
        match self.position {
            Some(pos) if pos < self.entries.len() => &self.entries[pos],
            _ => panic!("SnapshotIterator accessed while not valid"),
        }
    }
}

impl StoreIterator for SnapshotIterator {
    fn seek_to_first(&mut self) {
        self.position = Some(0);
    }

    fn valid(&self) -> bool {
        matches!(self.position, Some(pos) if pos < self.entries.len())
    }

    fn next(&mut self) {
        if let Some(pos) = self.position.as_mut() {
            *pos += 1;
        }
    }

    fn key(&self) -> &[u8] {
        &self.current().0
    }

    fn value(&self) -> &[u8] {
        &self.current().1
    }

    fn status(&self) -> Result<()> {
        Ok(())
    }
}
