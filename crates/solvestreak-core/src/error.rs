//! Core error types for solvestreak-core.
//!
//! Most of the update pipeline degrades instead of failing, so these errors
//! surface mainly from configuration loading and durable writes, where the
//! caller decides whether to log and continue.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for solvestreak-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// History/snapshot persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration at {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },
}

/// Persistence errors for the history record and the output files.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Durable write (temp file, sync, rename) failed
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record could not be serialized
    #[error("Failed to serialize {what}: {message}")]
    SerializeFailed { what: &'static str, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
