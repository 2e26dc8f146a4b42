//! Exit codes for the `yorc` CLI.
//!
//! Exit codes communicate operation outcome without requiring output parsing.

/// Exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed
    Clean = 0,

    /// Requested record does not exist
    NotFound = 1,

    /// Configuration error
    ConfigError = 10,

    /// Submitted document could not be decoded
    ParseError = 11,

    /// Storage backend failure
    StorageError = 12,

    /// I/O error
    IoError = 13,

    /// Argument accepted by the parser but not meaningful
    InvalidArgument = 14,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_process_exit_values() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::NotFound.as_i32(), 1);
        assert_eq!(ExitCode::ParseError.as_i32(), 11);
        assert_eq!(ExitCode::InvalidArgument.as_i32(), 14);
        assert_eq!(ExitCode::InternalError.as_i32(), 99);
    }
}
