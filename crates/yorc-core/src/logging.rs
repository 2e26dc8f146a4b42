//! Subscriber setup for the `yorc` binary.
//!
//! Logs go to stderr so stdout stays clean for command output.

use tracing_subscriber::EnvFilter;
use yorc_config::{LogFormat, LogSettings};

/// Errors from subscriber installation.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter {directive:?}: {source}")]
    Filter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Filter from `RUST_LOG` when set, else the configured level.
pub fn filter_for(settings: &LogSettings) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.level).map_err(|source| LoggingError::Filter {
        directive: settings.level.clone(),
        source,
    })
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(settings: &LogSettings) -> Result<(), LoggingError> {
    let filter = filter_for(settings)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    installed.map_err(|e| LoggingError::Install(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_directive_is_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let settings = LogSettings {
            level: "yorc_core=notalevel".to_string(),
            ..LogSettings::default()
        };
        let err = filter_for(&settings).unwrap_err();
        assert!(err.to_string().contains("notalevel"));
    }

    #[test]
    fn test_default_level_is_accepted() {
        assert!(filter_for(&LogSettings::default()).is_ok());
    }
}
