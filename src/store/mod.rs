//! Store Module
//!
//! The ordered key-value contract the record layer is written against,
//! plus two implementations.
//!
//! ## Contract
//! - Keys and values are opaque byte strings
//! - Keys are ordered byte-wise; iteration yields strictly ascending keys
//! - `get` of an absent key is `KeyNotFound`
//! - Iterators are released on drop
//!
//! ## Implementations
//! - [`MemStore`]: in-memory BTreeMap behind an RwLock
//! - [`FileStore`]: a `MemStore` persisted as one sorted table file

mod memory;
mod file;
pub mod table;

pub use memory::{MemStore, SnapshotIterator};
pub use file::FileStore;

use crate::error::Result;

/// Opaque byte-string key addressing one stored value
pub type Key = Vec<u8>;

/// An ordered map from byte-string keys to byte-string values
pub trait OrderedStore {
    /// Iterator type returned by [`OrderedStore::new_iterator`]
    type Iter<'a>: StoreIterator
    where
        Self: 'a;

    /// Store `value` under `key`, replacing any existing value
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Read the value for `key`
    ///
    /// Returns `Err(KeyNotFound)` if the key is absent.
    fn get(&self, key: &[u8]) -> Result<Vec<u8>>;

    /// Open a new iterator. It is not positioned until `seek_to_first`.
    fn new_iterator(&self) -> Result<Self::Iter<'_>>;
}

/// Cursor over the entries of an [`OrderedStore`]
///
/// `key()` and `value()` may only be called while `valid()` is true.
pub trait StoreIterator {
    /// Position at the smallest key
    fn seek_to_first(&mut self);

    /// True while positioned at an entry
    fn valid(&self) -> bool;

    /// Advance to the next key
    fn next(&mut self);

    fn key(&self) -> &[u8];

    fn value(&self) -> &[u8];

    /// Any error the iterator has hit so far
    fn status(&self) -> Result<()>;
}
