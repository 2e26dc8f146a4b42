//! Generator usage statistics configuration loading and validation.
//!
//! This crate provides:
//! - Typed settings loaded from `config.toml`
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation that reports every problem at once

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{resolve_config, ConfigPaths, ConfigSource, ResolvedConfig};
pub use settings::{LogFormat, LogSettings, Settings, MAX_WINDOW_DAYS};
pub use validate::{validate, ValidationError, ValidationResult};

use std::path::PathBuf;
use thiserror::Error;

/// Directory name used under XDG config and data roots.
pub const APP_DIR_NAME: &str = "yorc_stats";

/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid configuration: {}", format_problems(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_problems(problems: &[ValidationError]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
