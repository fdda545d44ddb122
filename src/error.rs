//! Error types for FieldKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using FieldKvError
pub type Result<T> = std::result::Result<T, FieldKvError>;

/// Unified error type for FieldKV operations
#[derive(Debug, Error)]
pub enum FieldKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Record too large: {0}")]
    RecordTooLarge(String),

    #[error("Invalid field {0:?}: expected NAME=VALUE")]
    InvalidField(String),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    KeyNotFound,

    #[error("Table corruption detected: {0}")]
    TableCorruption(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
