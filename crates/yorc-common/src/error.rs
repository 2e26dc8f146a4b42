//! Decoder error type.

use thiserror::Error;

/// Why a submitted document could not be turned into a usage record.
///
/// Only structural problems are errors. Missing or oddly shaped attributes
/// are not: they fall back to their defaults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The payload is not well-formed JSON.
    #[error("document is not valid JSON at line {line}, column {column}: {message}")]
    Malformed {
        message: String,
        line: usize,
        column: usize,
    },

    /// The payload is JSON but its root is not an object.
    #[error("document root must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// The generator configuration sub-object is absent.
    #[error("document has no \"{key}\" configuration object")]
    MissingConfiguration { key: &'static str },
}

impl ParseError {
    /// Stable machine-readable kind, used in JSON error output.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::Malformed { .. } => "malformed",
            ParseError::NotAnObject { .. } => "not_an_object",
            ParseError::MissingConfiguration { .. } => "missing_configuration",
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Malformed {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serde_error_keeps_position() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  \"a\": }").unwrap_err();
        let parse: ParseError = err.into();
        match parse {
            ParseError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_display_names_missing_key() {
        let err = ParseError::MissingConfiguration {
            key: "generator-jhipster",
        };
        assert!(err.to_string().contains("generator-jhipster"));
        assert_eq!(err.kind(), "missing_configuration");
    }
}
