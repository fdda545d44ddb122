//! Table Module
//!
//! A single immutable sorted file holding every entry of a [`FileStore`].
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (14 bytes)                                       │
//! │   Magic: "FKVT" (4) | Version: u16 (2) | Count: u64 (8) │
//! ├─────────────────────────────────────────────────────────┤
//! │ Data Block (variable)                                   │
//! │   [KeyLen: u32][ValLen: u32][Key][Value]                │
//! │   ... repeated for each entry, keys ascending ...       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (8 bytes)                                        │
//! │   DataCRC: u32 (4) | Padding (4)                        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian.
//!
//! [`FileStore`]: crate::store::FileStore

mod builder;
mod iterator;
mod reader;

use std::path::PathBuf;

pub use builder::TableBuilder;
pub use iterator::TableIterator;
pub use reader::TableReader;

// =============================================================================
// Shared Constants (used by builder, reader, iterator)
// =============================================================================

/// Magic bytes identifying a FieldKV table file
pub(crate) const MAGIC: &[u8; 4] = b"FKVT";

/// Current table format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + EntryCount (8) = 14 bytes
pub(crate) const HEADER_SIZE: u64 = 14;

/// Footer size: DataCRC (4) + Padding (4) = 8 bytes
pub(crate) const FOOTER_SIZE: u64 = 8;

/// Per-entry header: KeyLen (4) + ValLen (4)
pub(crate) const ENTRY_HEADER_SIZE: u64 = 8;

// =============================================================================
// Table Metadata
// =============================================================================

/// Metadata for a finished table file
#[derive(Debug, Clone)]
pub struct TableMeta {
    /// Path to the table file
    pub path: PathBuf,
    /// Number of entries in the table
    pub entry_count: u64,
    /// CRC32 over the data block
    pub data_crc: u32,
    /// File size in bytes
    pub file_size: u64,
}
