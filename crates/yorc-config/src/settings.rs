//! Typed settings.
//!
//! Every field has a default so an absent or partial `config.toml` is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::APP_DIR_NAME;

/// Database file name inside the data directory.
const DATABASE_FILE_NAME: &str = "yorc.db";

/// Largest accepted `default_window_days` (about a century).
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite database holding usage records.
    pub database_path: PathBuf,

    /// Window used by stats commands when no explicit lower bound is given.
    pub default_window_days: u32,

    pub log: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            default_window_days: 365,
            log: LogSettings::default(),
        }
    }
}

/// Logging configuration consumed by the binary's subscriber setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `info`, `yorc_core=debug`).
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log line rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Default database location: `$XDG_DATA_HOME/yorc_stats/yorc.db`, then the
/// platform data dir, then the working directory.
pub fn default_database_path() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join(APP_DIR_NAME).join(DATABASE_FILE_NAME);
    }
    dirs::data_dir()
        .map(|base| base.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATABASE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str("default_window_days = 30").unwrap();
        assert_eq!(settings.default_window_days, 30);
        assert_eq!(settings.log, LogSettings::default());
    }

    #[test]
    fn test_log_format_parses() {
        let settings: Settings = toml::from_str("[log]\nformat = \"json\"\nlevel = \"debug\"").unwrap();
        assert_eq!(settings.log.format, LogFormat::Json);
        assert_eq!(settings.log.level, "debug");
    }

    #[test]
    fn test_default_database_file_name() {
        let path = default_database_path();
        assert!(path.ends_with("yorc.db"));
    }
}
