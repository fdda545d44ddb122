//! Configuration for FieldKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::query::MalformedPolicy;

/// Main configuration for a file-backed FieldKV store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the store
    /// Internal structure:
    ///   {data_dir}/
    ///     └── records.tbl      (sorted table of encoded records)
    pub data_dir: PathBuf,

    /// Create `data_dir` on open if it does not exist
    pub create_if_missing: bool,

    /// Refuse to open a directory that already holds a table
    pub error_if_exists: bool,

    /// When buffered writes are persisted to the table file
    pub flush_policy: FlushPolicy,

    // -------------------------------------------------------------------------
    // Query Configuration
    // -------------------------------------------------------------------------
    /// What a scan does with a value that fails to decode
    pub malformed_policy: MalformedPolicy,
}

/// Table flush strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Rewrite the table after every write (safest, slowest)
    EveryWrite,

    /// Rewrite the table after N unflushed writes
    EveryNWrites { count: usize },

    /// Only on explicit `flush()` / `close()`
    OnClose,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./fieldkv_data"),
            create_if_missing: true,
            error_if_exists: false,
            flush_policy: FlushPolicy::EveryNWrites { count: 100 },
            malformed_policy: MalformedPolicy::Skip,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.config.create_if_missing = create;
        self
    }

    pub fn error_if_exists(mut self, error: bool) -> Self {
        self.config.error_if_exists = error;
        self
    }

    /// Set the table flush policy
    pub fn flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.config.flush_policy = policy;
        self
    }

    /// Set the scan policy for values that fail to decode
    pub fn malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.config.malformed_policy = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
