//! Semantic validation of resolved settings.

use std::fmt;

use crate::settings::{Settings, MAX_WINDOW_DAYS};

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of validating a settings value.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Validate settings, collecting every problem instead of stopping at the first.
pub fn validate(settings: &Settings) -> ValidationResult {
    let mut problems = Vec::new();

    if settings.database_path.as_os_str().is_empty() {
        problems.push(ValidationError {
            field: "database_path",
            message: "must not be empty".to_string(),
        });
    }

    if settings.default_window_days == 0 {
        problems.push(ValidationError {
            field: "default_window_days",
            message: "must be at least 1".to_string(),
        });
    } else if settings.default_window_days > MAX_WINDOW_DAYS {
        problems.push(ValidationError {
            field: "default_window_days",
            message: format!("must be at most {MAX_WINDOW_DAYS}"),
        });
    }

    if settings.log.level.trim().is_empty() {
        problems.push(ValidationError {
            field: "log.level",
            message: "must not be empty".to_string(),
        });
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&Settings::default()).is_ok());
    }

    #[test]
    fn test_collects_all_problems() {
        let mut settings = Settings::default();
        settings.database_path = PathBuf::new();
        settings.default_window_days = 0;
        settings.log.level = "  ".to_string();

        let problems = validate(&settings).unwrap_err();
        let fields: Vec<_> = problems.iter().map(|p| p.field).collect();
        assert_eq!(fields, vec!["database_path", "default_window_days", "log.level"]);
    }

    #[test]
    fn test_window_upper_bound() {
        let mut settings = Settings::default();
        settings.default_window_days = MAX_WINDOW_DAYS;
        assert!(validate(&settings).is_ok());

        settings.default_window_days = u32::MAX;
        let problems = validate(&settings).unwrap_err();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].field, "default_window_days");
        assert!(problems[0].message.contains("at most"));
    }
}
