//! Table Reader
//!
//! Opens table files, validates header and footer, and reads entries back.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{FieldKvError, Result};

use super::iterator::TableIterator;
use super::{FOOTER_SIZE, HEADER_SIZE, MAGIC, VERSION};

/// Reader for table files
pub struct TableReader {
    /// File handle for reading entries
    file: BufReader<File>,
    entry_count: u64,
    /// Start of the footer
    data_end: u64,
    data_crc: u32,
}

impl TableReader {
    /// Open a table for reading
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len();

        if file_size < HEADER_SIZE + FOOTER_SIZE {
            return Err(FieldKvError::TableCorruption(format!(
                "Table file too short: {} bytes",
                file_size
            )));
        }

        // Read and validate header
        let mut header = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header)?;

        if &header[0..4] != MAGIC {
            return Err(FieldKvError::TableCorruption(format!(
                "Invalid table magic: expected FKVT, got {:?}",
                &header[0..4]
            )));
        }

        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != VERSION {
            return Err(FieldKvError::TableCorruption(format!(
                "Unsupported table version: {}",
                version
            )));
        }

        let mut count_bytes = [0u8; 8];
        count_bytes.copy_from_slice(&header[6..14]);
        let entry_count = u64::from_le_bytes(count_bytes);

        // Footer
        file.seek(SeekFrom::End(-(FOOTER_SIZE as i64)))?;
        let mut footer = [0u8; FOOTER_SIZE as usize];
        file.read_exact(&mut footer)?;
        let data_crc = u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]);

        Ok(Self {
            file: BufReader::new(file),
            entry_count,
            data_end: file_size - FOOTER_SIZE,
            data_crc,
        })
    }

    /// Get entry count
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Create an iterator over all entries
    pub fn iter(&mut self) -> Result<TableIterator<'_>> {
        TableIterator::new(&mut self.file, self.entry_count, self.data_end, self.data_crc)
    }

    /// Read every entry, checking order and checksum
    pub fn read_all(&mut self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut entries: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();
        for entry in self.iter()? {
            let (key, value) = entry?;
            if let Some((last, _)) = entries.last() {
                if key <= *last {
                    return Err(FieldKvError::TableCorruption(format!(
                        "Keys out of order at entry {}",
                        entries.len()
                    )));
                }
            }
            entries.push((key, value));
        }
        Ok(entries)
    }
}
