//! # FieldKV
//!
//! Structured records over an ordered key-value store:
//! - Length-prefixed binary codec for ordered name/value field lists
//! - Record-level `put` / `get` over any ordered store
//! - Field queries by full, key-ordered scan
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │          FieldStore facade  /  ScanQuery (full scan)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Record Codec                             │
//! │         [count][name_len][name][value_len][value]...         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 OrderedStore (trait)                         │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!   ┌─────────────────┐           ┌──────────────────┐
//!   │    MemStore     │ ◄──────── │    FileStore     │
//!   │ (RwLock+BTree)  │           │ (sorted table)   │
//!   └─────────────────┘           └──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use fieldkv::{FieldStore, MemStore, Record};
//!
//! let db = FieldStore::new(MemStore::new());
//! db.put(b"k_1", &Record::new().with_field("name", "Customer#000000001")).unwrap();
//!
//! let keys = db.find_keys_by_field(b"name", b"Customer#000000001").unwrap();
//! assert_eq!(keys, vec![b"k_1".to_vec()]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod store;
pub mod facade;
pub mod query;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FieldKvError, Result};
pub use config::{Config, FlushPolicy};
pub use record::{decode, encode, Field, Record};
pub use store::{FileStore, Key, MemStore, OrderedStore, StoreIterator};
pub use facade::FieldStore;
pub use query::{find_keys_by_field, MalformedPolicy, ScanOutcome, ScanQuery, ScanStats};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of FieldKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
