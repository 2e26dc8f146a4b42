//! Error type for service operations.

use thiserror::Error;
use yorc_common::{ParseError, RecordId};
use yorc_config::ConfigError;
use yorc_store::StoreError;

use crate::exit_codes::ExitCode;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the usage statistics service.
///
/// Variants are grouped by their [`Error::code`] range. Process exit codes
/// are a separate, coarser scheme; see [`Error::exit_code`].
#[derive(Error, Debug)]
pub enum Error {
    // code() 10-19: configuration and arguments
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // code() 20-29: ingestion and lookup
    #[error("could not parse document: {0}")]
    Parse(#[from] ParseError),

    #[error("usage record {id} not found")]
    NotFound { id: RecordId },

    // code() 30-39: storage
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    // code() 60-69: I/O and serialization
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Detailed error code reported in JSON error output. Not the process
    /// exit code.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidArgument(_) => 11,
            Error::Parse(_) => 20,
            Error::NotFound { .. } => 21,
            Error::Storage(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Stable machine-readable kind for JSON error output.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::Parse(err) => err.kind(),
            Error::NotFound { .. } => "not_found",
            Error::Storage(_) => "storage",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Error::Config(_) => ExitCode::ConfigError,
            Error::InvalidArgument(_) => ExitCode::InvalidArgument,
            Error::Parse(_) => ExitCode::ParseError,
            Error::NotFound { .. } => ExitCode::NotFound,
            Error::Storage(_) => ExitCode::StorageError,
            Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}
