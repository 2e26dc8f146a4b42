//! Config resolution: CLI → env → XDG → defaults.
//!
//! The first location that names a config file wins. A file named explicitly
//! (by flag or `YORC_CONFIG`) must exist; the XDG location is optional.
//! Environment overrides are applied on top of whatever was loaded.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::settings::Settings;
use crate::validate::validate;
use crate::{ConfigError, APP_DIR_NAME, CONFIG_FILE_NAME};

/// Environment variable naming a config file.
pub const ENV_CONFIG: &str = "YORC_CONFIG";
/// Environment variable overriding `database_path`.
pub const ENV_DATABASE: &str = "YORC_DB";
/// Environment variable overriding `log.level`.
pub const ENV_LOG_LEVEL: &str = "YORC_LOG";

/// Candidate config file locations, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPaths {
    /// From the `--config` flag.
    pub explicit: Option<PathBuf>,
    /// From `YORC_CONFIG`.
    pub env: Option<PathBuf>,
    /// `$XDG_CONFIG_HOME/yorc_stats/config.toml` or the platform equivalent.
    pub xdg: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover candidate locations from the process environment.
    pub fn discover(explicit: Option<PathBuf>) -> Self {
        let env = std::env::var_os(ENV_CONFIG).map(PathBuf::from);
        let xdg = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
            .map(|base| base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
        Self { explicit, env, xdg }
    }
}

/// Where the effective settings came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Env(PathBuf),
    Xdg(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Env(p) | ConfigSource::Xdg(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

/// Settings plus their provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub settings: Settings,
    pub source: ConfigSource,
}

/// Resolve settings using the process environment for overrides.
pub fn resolve_config(paths: &ConfigPaths) -> Result<ResolvedConfig, ConfigError> {
    resolve_config_with(paths, |key| std::env::var(key).ok())
}

/// Resolve settings with an explicit environment lookup.
pub fn resolve_config_with<F>(paths: &ConfigPaths, env: F) -> Result<ResolvedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let (mut settings, source) = if let Some(path) = &paths.explicit {
        (load_required(path)?, ConfigSource::Explicit(path.clone()))
    } else if let Some(path) = &paths.env {
        (load_required(path)?, ConfigSource::Env(path.clone()))
    } else if let Some(path) = paths.xdg.as_ref().filter(|p| p.exists()) {
        (load_file(path)?, ConfigSource::Xdg(path.clone()))
    } else {
        (Settings::default(), ConfigSource::Defaults)
    };

    apply_env_overrides(&mut settings, env);
    validate(&settings).map_err(ConfigError::Invalid)?;

    debug!(source = ?source, database = %settings.database_path.display(), "configuration resolved");
    Ok(ResolvedConfig { settings, source })
}

fn load_required(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    load_file(path)
}

/// Parse a settings file.
pub fn load_file(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides<F>(settings: &mut Settings, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(db) = env(ENV_DATABASE).filter(|v| !v.is_empty()) {
        settings.database_path = PathBuf::from(db);
    }
    if let Some(level) = env(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
        settings.log.level = level;
    }
}
