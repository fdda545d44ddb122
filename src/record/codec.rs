//! Record codec
//!
//! Encoding and decoding of records to a flat, self-delimiting byte sequence.
//!
//! ## Wire Format
//! ```text
//! ┌────────────────┐
//! │ FieldCount (4) │
//! ├────────────────┴──────────────────────────────────────┐
//! │ NameLen (4) │ Name │ ValueLen (4) │ Value             │
//! │ ... repeated FieldCount times ...                     │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are u32 little-endian. Lengths are explicit, so names and
//! values may contain any byte; nothing is escaped.

use bytes::{Buf, BufMut};

use super::Record;
use crate::error::{FieldKvError, Result};

/// Size of every count/length prefix
pub const LEN_PREFIX_SIZE: usize = 4;

/// Smallest possible encoded field: two empty length-prefixed strings
const MIN_FIELD_SIZE: usize = 2 * LEN_PREFIX_SIZE;

// =============================================================================
// Encoding
// =============================================================================

/// Exact number of bytes `encode` produces for this record
pub fn encoded_len(record: &Record) -> usize {
    LEN_PREFIX_SIZE
        + record
            .iter()
            .map(|f| MIN_FIELD_SIZE + f.name.len() + f.value.len())
            .sum::<usize>()
}

/// Encode a record to bytes
///
/// Fails only when a count or length does not fit in a u32.
pub fn encode(record: &Record) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(encoded_len(record));

    buf.put_u32_le(length_prefix(record.len(), "field count")?);
    for field in record {
        buf.put_u32_le(length_prefix(field.name.len(), "field name")?);
        buf.put_slice(&field.name);
        buf.put_u32_le(length_prefix(field.value.len(), "field value")?);
        buf.put_slice(&field.value);
    }

    Ok(buf)
}

fn length_prefix(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        FieldKvError::RecordTooLarge(format!(
            "{} length {} exceeds u32::MAX",
            what, len
        ))
    })
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a record from bytes
///
/// An empty slice decodes to the empty record. Every declared length is
/// checked against the remaining input before it is read, and input left
/// over after the last field is rejected.
pub fn decode(bytes: &[u8]) -> Result<Record> {
    if bytes.is_empty() {
        return Ok(Record::new());
    }

    let mut buf = bytes;
    let count = read_len(&mut buf, "field count")?;

    // A hostile count must not drive the allocation
    let mut record = Record::with_capacity(count.min(buf.remaining() / MIN_FIELD_SIZE));

    for index in 0..count {
        let name_len = read_len(&mut buf, "field name length")?;
        let name = read_bytes(&mut buf, name_len, index, "name")?;
        let value_len = read_len(&mut buf, "field value length")?;
        let value = read_bytes(&mut buf, value_len, index, "value")?;
        record.push(name, value);
    }

    if buf.has_remaining() {
        return Err(FieldKvError::MalformedRecord(format!(
            "{} trailing bytes after {} fields",
            buf.remaining(),
            count
        )));
    }

    Ok(record)
}

fn read_len(buf: &mut &[u8], what: &str) -> Result<usize> {
    if buf.remaining() < LEN_PREFIX_SIZE {
        return Err(FieldKvError::MalformedRecord(format!(
            "truncated {}: expected {} bytes, got {}",
            what,
            LEN_PREFIX_SIZE,
            buf.remaining()
        )));
    }
    Ok(buf.get_u32_le() as usize)
}

fn read_bytes(buf: &mut &[u8], len: usize, index: usize, what: &str) -> Result<Vec<u8>> {
    if buf.remaining() < len {
        return Err(FieldKvError::MalformedRecord(format!(
            "field {}: {} declares {} bytes, only {} remaining",
            index,
            what,
            len,
            buf.remaining()
        )));
    }
    let out = buf[..len].to_vec();
    buf.advance(len);
    Ok(out)
}
