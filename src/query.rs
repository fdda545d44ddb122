//! Scan Query
//!
//! Field lookups by full, ordered scan. There is no secondary index: every
//! query walks every stored record once, in ascending key order.
//!
//! ## Malformed values
//! A stored value that does not decode is handled per [`MalformedPolicy`]:
//! - `Skip` (default): logged at `warn`, counted in [`ScanStats::skipped`],
//!   scan continues
//! - `Abort`: the scan stops and returns `MalformedRecord` naming the key
//!
//! The store iterator is owned by the scan call and dropped on every exit.

use std::ops::ControlFlow;

use crate::error::{FieldKvError, Result};
use crate::record::{decode, Record};
use crate::store::{Key, OrderedStore, StoreIterator};

/// What a scan does with a value that fails to decode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Log and continue
    #[default]
    Skip,

    /// Stop with `MalformedRecord`
    Abort,
}

/// Counters from one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Entries visited (including skipped ones)
    pub scanned: usize,
    /// Entries that failed to decode and were skipped
    pub skipped: usize,
}

/// Result of a [`ScanQuery`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Matching keys, ascending
    pub keys: Vec<Key>,
    pub stats: ScanStats,
}

/// Visit every decodable record in ascending key order
///
/// The visitor may stop the scan early by returning `ControlFlow::Break`.
pub fn scan<S, F>(store: &S, policy: MalformedPolicy, mut visit: F) -> Result<ScanStats>
where
    S: OrderedStore + ?Sized,
    F: FnMut(&[u8], &Record) -> ControlFlow<()>,
{
    let mut iter = store.new_iterator()?;
    let mut stats = ScanStats::default();

    iter.seek_to_first();
    while iter.valid() {
        stats.scanned += 1;

        match decode(iter.value()) {
            Ok(record) => {
                if visit(iter.key(), &record).is_break() {
                    return Ok(stats);
                }
            }
            Err(e) => match policy {
                MalformedPolicy::Skip => {
                    tracing::warn!(
                        "Skipping malformed record at key {:?}: {}",
                        String::from_utf8_lossy(iter.key()),
                        e
                    );
                    stats.skipped += 1;
                }
                MalformedPolicy::Abort => {
                    return Err(with_key(e, iter.key()));
                }
            },
        }

        iter.next();
    }

    iter.status()?;
    Ok(stats)
}

fn with_key(err: FieldKvError, key: &[u8]) -> FieldKvError {
    match err {
        FieldKvError::MalformedRecord(msg) => FieldKvError::MalformedRecord(format!(
            "key {:?}: {}",
            String::from_utf8_lossy(key),
            msg
        )),
        other => other,
    }
}

/// Exact-match query on one field
///
/// ```
/// use fieldkv::{MemStore, Record, ScanQuery};
///
/// let store = MemStore::new();
/// fieldkv::facade::put(&store, b"k1", &Record::new().with_field("name", "X")).unwrap();
///
/// let outcome = ScanQuery::new("name", "X").run(&store).unwrap();
/// assert_eq!(outcome.keys, vec![b"k1".to_vec()]);
/// ```
#[derive(Debug, Clone)]
pub struct ScanQuery {
    name: Vec<u8>,
    value: Vec<u8>,
    policy: MalformedPolicy,
    limit: Option<usize>,
}

impl ScanQuery {
    /// Match records holding a field with exactly this name and value
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            policy: MalformedPolicy::default(),
            limit: None,
        }
    }

    /// Set the malformed-value policy
    pub fn policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Stop after this many matches
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run the scan against a store
    pub fn run<S: OrderedStore + ?Sized>(&self, store: &S) -> Result<ScanOutcome> {
        let mut keys = Vec::new();

        if self.limit == Some(0) {
            return Ok(ScanOutcome::default());
        }

        let stats = scan(store, self.policy, |key, record| {
            if record.contains(&self.name, &self.value) {
                keys.push(key.to_vec());
                if self.limit.is_some_and(|limit| keys.len() >= limit) {
                    return ControlFlow::Break(());
                }
            }
            ControlFlow::Continue(())
        })?;

        tracing::debug!(
            "Scan {}={}: {} matches in {} records ({} skipped)",
            String::from_utf8_lossy(&self.name),
            String::from_utf8_lossy(&self.value),
            keys.len(),
            stats.scanned,
            stats.skipped
        );

        Ok(ScanOutcome { keys, stats })
    }
}

/// Keys of all records with a field `name` equal to `value`, ascending
///
/// Malformed values are skipped (see [`MalformedPolicy::Skip`]).
pub fn find_keys_by_field<S: OrderedStore + ?Sized>(
    store: &S,
    name: &[u8],
    value: &[u8],
) -> Result<Vec<Key>> {
    Ok(ScanQuery::new(name, value).run(store)?.keys)
}
