//! Table Builder
//!
//! Writes sorted key-value entries to a new table file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{FieldKvError, Result};

use super::{TableMeta, ENTRY_HEADER_SIZE, HEADER_SIZE, MAGIC, VERSION};

/// Builder for creating a table from sorted entries
pub struct TableBuilder {
    /// Output file path
    path: PathBuf,
    /// Buffered writer for performance
    writer: BufWriter<File>,
    /// Number of entries written
    entry_count: u64,
    /// Bytes written so far
    current_offset: u64,
    /// Last key added, to enforce ascending order
    last_key: Option<Vec<u8>>,
    /// Running CRC hasher for data section
    data_hasher: crc32fast::Hasher,
}

impl TableBuilder {
    /// Create a new table builder
    ///
    /// Writes the header immediately; call `add()` in ascending key order,
    /// then `finish()` to write the footer and sync.
    pub fn new(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);

        // Entry count is patched in finish()
        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&0u64.to_le_bytes())?;

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            entry_count: 0,
            current_offset: HEADER_SIZE,
            last_key: None,
            data_hasher: crc32fast::Hasher::new(),
        })
    }

    /// Add a key-value pair (keys must be strictly ascending)
    pub fn add(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if let Some(last) = &self.last_key {
            if key <= last.as_slice() {
                return Err(FieldKvError::Storage(format!(
                    "Table keys out of order: {:?} after {:?}",
                    String::from_utf8_lossy(key),
                    String::from_utf8_lossy(last)
                )));
            }
        }

        let key_len = len_u32(key.len(), "key")?.to_le_bytes();
        let val_len = len_u32(value.len(), "value")?.to_le_bytes();

        // [key_len(4)][val_len(4)][key][value]
        for chunk in [&key_len[..], &val_len[..], key, value] {
            self.writer.write_all(chunk)?;
            self.data_hasher.update(chunk);
        }

        self.current_offset += ENTRY_HEADER_SIZE + key.len() as u64 + value.len() as u64;
        self.entry_count += 1;
        self.last_key = Some(key.to_vec());

        Ok(())
    }

    /// Number of entries added so far
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Finish building: write footer, patch the header, sync to disk
    pub fn finish(mut self) -> Result<TableMeta> {
        let data_crc = self.data_hasher.finalize();

        // Footer: data_crc (4) + padding (4)
        self.writer.write_all(&data_crc.to_le_bytes())?;
        self.writer.write_all(&[0u8; 4])?;
        self.writer.flush()?;

        let mut file = self.writer.into_inner().map_err(|e| {
            FieldKvError::Storage(format!("Failed to flush table: {}", e))
        })?;
        file.seek(SeekFrom::Start(6))?; // After magic + version
        file.write_all(&self.entry_count.to_le_bytes())?;
        file.sync_all()?;

        let file_size = file.metadata()?.len();

        Ok(TableMeta {
            path: self.path,
            entry_count: self.entry_count,
            data_crc,
            file_size,
        })
    }
}

fn len_u32(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        FieldKvError::Storage(format!("Table {} of {} bytes exceeds u32::MAX", what, len))
    })
}
