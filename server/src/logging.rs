//! Tracing subscriber setup.
//!
//! `RUST_LOG`, when set, replaces the configured level directive.

use thiserror::Error;
use tracing_subscriber::{filter::ParseError, EnvFilter};

use crate::config::{LogConfig, LogFormat};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter")]
    Filter(#[from] ParseError),

    #[error("failed to install tracing subscriber: {0}")]
    Init(String),
}

pub fn filter(config: &LogConfig) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(&config.level)?),
    }
}

pub fn init(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let result = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| LoggingError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_level_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LogConfig {
            level: "todo_server=loud".to_string(),
            ..LogConfig::default()
        };
        assert!(matches!(filter(&config), Err(LoggingError::Filter(_))));
    }

    #[test]
    fn default_level_parses() {
        assert!(filter(&LogConfig::default()).is_ok());
    }
}
