//! Error types for storage operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error while preparing the database location
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A thread panicked while holding the store lock
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
