//! Table Iterator
//!
//! Sequential, checksummed iteration over all entries in a table.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};

use crate::error::{FieldKvError, Result};

use super::{ENTRY_HEADER_SIZE, HEADER_SIZE};

/// Iterator over table entries in file order
///
/// Verifies the data CRC once the last entry has been read; a mismatch is
/// yielded as a final `Err`.
pub struct TableIterator<'a> {
    file: &'a mut BufReader<File>,
    /// Entries still to read
    remaining: u64,
    /// Start of the footer; no entry may extend past it
    end_offset: u64,
    /// Current position in file
    current_offset: u64,
    expected_crc: u32,
    hasher: Option<crc32fast::Hasher>,
    failed: bool,
}

impl<'a> TableIterator<'a> {
    /// Create a new iterator starting from the data block
    pub(super) fn new(
        file: &'a mut BufReader<File>,
        entry_count: u64,
        end_offset: u64,
        expected_crc: u32,
    ) -> Result<Self> {
        file.seek(SeekFrom::Start(HEADER_SIZE))?;
        Ok(Self {
            file,
            remaining: entry_count,
            end_offset,
            current_offset: HEADER_SIZE,
            expected_crc,
            hasher: Some(crc32fast::Hasher::new()),
            failed: false,
        })
    }

    fn read_entry(&mut self) -> Result<(Vec<u8>, Vec<u8>)> {
        let mut header = [0u8; ENTRY_HEADER_SIZE as usize];
        self.take(&mut header)?;

        let key_len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as u64;
        let val_len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as u64;

        if self.current_offset + key_len + val_len > self.end_offset {
            return Err(FieldKvError::TableCorruption(format!(
                "Entry at offset {} overruns data block ({} + {} bytes, data ends at {})",
                self.current_offset, key_len, val_len, self.end_offset
            )));
        }

        let mut key = vec![0u8; key_len as usize];
        self.take(&mut key)?;
        let mut value = vec![0u8; val_len as usize];
        self.take(&mut value)?;

        Ok((key, value))
    }

    fn take(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.current_offset + buf.len() as u64 > self.end_offset {
            return Err(FieldKvError::TableCorruption(format!(
                "Truncated entry at offset {}",
                self.current_offset
            )));
        }
        self.file.read_exact(buf)?;
        if let Some(hasher) = self.hasher.as_mut() {
            hasher.update(buf);
        }
        self.current_offset += buf.len() as u64;
        Ok(())
    }

    /// Called after the last entry
    fn verify(&mut self) -> Result<()> {
        if self.current_offset != self.end_offset {
            return Err(FieldKvError::TableCorruption(format!(
                "{} unexpected bytes after last entry",
                self.end_offset - self.current_offset
            )));
        }
        let actual = self.hasher.take().map(|h| h.finalize()).unwrap_or_default();
        if actual != self.expected_crc {
            return Err(FieldKvError::TableCorruption(format!(
                "Data CRC mismatch: expected {:#010x}, got {:#010x}",
                self.expected_crc, actual
            )));
        }
        Ok(())
    }
}

impl<'a> Iterator for TableIterator<'a> {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        if self.remaining == 0 {
            if self.hasher.is_none() {
                return None;
            }
            return match self.verify() {
                Ok(()) => None,
                Err(e) => {
                    self.failed = true;
                    Some(Err(e))
                }
            };
        }

        match self.read_entry() {
            Ok(entry) => {
                self.remaining -= 1;
                Some(Ok(entry))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
