//! File-backed store
//!
//! A [`MemStore`] persisted as a single sorted table file.
//!
//! ## Lifecycle
//! 1. `open` creates the data directory (if allowed) and loads the table
//! 2. Writes land in memory and count towards the flush policy
//! 3. `flush` rewrites the table atomically: temp file, fsync, rename
//! 4. `close` (or drop) flushes whatever is still pending

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::table::{TableBuilder, TableReader};
use super::{MemStore, OrderedStore, SnapshotIterator};
use crate::config::{Config, FlushPolicy};
use crate::error::{FieldKvError, Result};

/// Ordered store persisted to `{data_dir}/records.tbl`
pub struct FileStore {
    /// Store configuration
    config: Config,

    /// Path of the live table file
    table_path: PathBuf,

    /// All entries, authoritative between flushes
    memory: MemStore,

    /// Writes not yet in the table file. Also serializes flushes.
    unflushed: Mutex<usize>,
}

impl FileStore {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const TABLE_FILENAME: &'static str = "records.tbl";
    const TEMP_FILENAME: &'static str = "records.tbl.tmp";

    /// Open or create a store with the given config
    pub fn open(config: Config) -> Result<Self> {
        let data_dir = &config.data_dir;

        if !data_dir.exists() {
            if !config.create_if_missing {
                return Err(FieldKvError::Config(format!(
                    "Data directory {} does not exist and create_if_missing is false",
                    data_dir.display()
                )));
            }
            fs::create_dir_all(data_dir)?;
        }

        let table_path = data_dir.join(Self::TABLE_FILENAME);
        let temp_path = data_dir.join(Self::TEMP_FILENAME);
        let table_exists = table_path.exists();

        // Refuse before touching anything in the directory
        if table_exists && config.error_if_exists {
            return Err(FieldKvError::Config(format!(
                "Store already exists at {} and error_if_exists is true",
                data_dir.display()
            )));
        }

        // Leftover from a flush that never reached the rename
        if temp_path.exists() {
            tracing::warn!("Removing stale temp table {}", temp_path.display());
            fs::remove_file(&temp_path)?;
        }

        let memory = if table_exists {
            let entries = TableReader::open(&table_path)?.read_all()?;
            tracing::info!(
                "Loaded {} entries from {}",
                entries.len(),
                table_path.display()
            );
            MemStore::from_entries(entries)
        } else {
            tracing::info!("Creating new store at {}", data_dir.display());
            MemStore::new()
        };

        Ok(Self {
            config,
            table_path,
            memory,
            unflushed: Mutex::new(0),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Write all entries to the table file, replacing it atomically
    pub fn flush(&self) -> Result<()> {
        let mut unflushed = self.unflushed.lock();
        self.write_table()?;
        *unflushed = 0;
        Ok(())
    }

    /// Flush pending writes and close the store
    ///
    /// On failure the pending writes are dropped along with the store;
    /// there is no second attempt on drop.
    pub fn close(self) -> Result<()> {
        let mut unflushed = self.unflushed.lock();
        if *unflushed == 0 {
            return Ok(());
        }
        let result = self.write_table();
        *unflushed = 0;
        result
    }

    fn write_table(&self) -> Result<()> {
        let temp_path = self.config.data_dir.join(Self::TEMP_FILENAME);

        let mut builder = TableBuilder::new(&temp_path)?;
        for (key, value) in self.memory.snapshot() {
            builder.add(&key, &value)?;
        }
        let meta = builder.finish()?;

        fs::rename(&temp_path, &self.table_path)?;

        tracing::info!(
            "Flushed {} entries ({} bytes) to {}",
            meta.entry_count,
            meta.file_size,
            self.table_path.display()
        );
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the table file path
    pub fn table_path(&self) -> &Path {
        &self.table_path
    }

    /// Number of writes not yet flushed
    pub fn unflushed_writes(&self) -> usize {
        *self.unflushed.lock()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl OrderedStore for FileStore {
    type Iter<'a> = SnapshotIterator;

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut unflushed = self.unflushed.lock();

        let previous = self.memory.insert(key, value);
        *unflushed += 1;

        let due = match self.config.flush_policy {
            FlushPolicy::EveryWrite => true,
            FlushPolicy::EveryNWrites { count } => *unflushed >= count,
            FlushPolicy::OnClose => false,
        };

        if due {
            if let Err(e) = self.write_table() {
                // A failed put leaves the store as it was
                match previous {
                    Some(old) => self.memory.insert(key, &old),
                    None => self.memory.remove(key),
                };
                *unflushed -= 1;
                return Err(e);
            }
            *unflushed = 0;
        }

        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.memory.get(key)
    }

    fn new_iterator(&self) -> Result<Self::Iter<'_>> {
        self.memory.new_iterator()
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        if *self.unflushed.get_mut() == 0 {
            return;
        }
        if let Err(e) = self.flush() {
            tracing::warn!(
                "Failed to flush {} on drop: {}",
                self.table_path.display(),
                e
            );
        }
    }
}
