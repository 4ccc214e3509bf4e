//! Core error types for quiethours-core.
//!
//! This module defines the error hierarchy using thiserror. Most runtime
//! paths deliberately recover instead of erroring (malformed persisted
//! values fall back to defaults, failed auto-replies are logged and
//! dropped); the errors here are the ones that must reach a caller.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for quiethours-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings store errors
    #[error("Settings store error: {0}")]
    Storage(#[from] StorageError),

    /// Whitelist validation errors
    #[error("Whitelist error: {0}")]
    Whitelist(#[from] WhitelistError),

    /// Alarm scheduling errors
    #[error("Alarm scheduler error: {0}")]
    Alarm(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings-store specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read a key
    #[error("Failed to read setting '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Failed to write a key
    #[error("Failed to write setting '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// Backing file could not be loaded or persisted
    #[error("Failed to access settings file at {path}: {message}")]
    FileAccess { path: PathBuf, message: String },
}

/// Whitelist mutation errors.
///
/// Raised at the mutation API boundary so a bad entry never reaches the
/// persisted flat string.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WhitelistError {
    /// Phone number was empty
    #[error("Whitelist number cannot be empty")]
    EmptyNumber,

    /// Phone number contains a serialization delimiter
    #[error("Whitelist number '{number}' contains the reserved delimiter '{delimiter}'")]
    ReservedDelimiter { number: String, delimiter: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
