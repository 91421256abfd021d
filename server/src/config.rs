//! Service configuration.
//!
//! # Design
//! Values are layered: built-in defaults, then the YAML file, then `TODO_*`
//! environment variables. Every section is `#[serde(default)]`, so a file
//! only needs the keys it changes. Override parsing goes through a lookup
//! function so tests never touch the process environment.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value {value:?} for {var}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid database url")]
    DatabaseUrl(#[source] tokio_postgres::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: ListenConfig,
    pub db: DbConfig,
    pub store: StoreKind,
    pub operation_timeout_ms: u64,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ListenConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// PostgreSQL connection settings. When `url` is set it takes precedence
/// over the individual fields.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub name: String,
    pub max_connections: usize,
    pub connect_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: None,
            name: "todo".to_string(),
            max_connections: 16,
            connect_timeout_secs: 5,
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl DbConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn pg_config(&self) -> Result<tokio_postgres::Config, ConfigError> {
        if let Some(url) = &self.url {
            let mut config: tokio_postgres::Config =
                url.parse().map_err(ConfigError::DatabaseUrl)?;
            config.connect_timeout(self.connect_timeout());
            return Ok(config);
        }

        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .dbname(&self.name)
            .connect_timeout(self.connect_timeout());
        if let Some(password) = &self.password {
            config.password(password);
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `todo_server=debug,info`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes as null rather than an empty mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    pub fn operation_timeout(&self) -> Duration {
        if self.operation_timeout_ms == 0 {
            todo_core::DEFAULT_OPERATION_TIMEOUT
        } else {
            Duration::from_millis(self.operation_timeout_ms)
        }
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TODO_LISTEN_HOST") {
            self.listen.host = v;
        }
        // `PORT` is honoured for platforms that inject it.
        if let Some(v) = lookup("PORT") {
            self.listen.port = parse_var("PORT", v)?;
        }
        if let Some(v) = lookup("TODO_LISTEN_PORT") {
            self.listen.port = parse_var("TODO_LISTEN_PORT", v)?;
        }
        if let Some(v) = lookup("TODO_DB_URL") {
            self.db.url = Some(v);
        }
        if let Some(v) = lookup("TODO_DB_HOST") {
            self.db.host = v;
        }
        if let Some(v) = lookup("TODO_DB_PORT") {
            self.db.port = parse_var("TODO_DB_PORT", v)?;
        }
        if let Some(v) = lookup("TODO_DB_USER") {
            self.db.user = v;
        }
        if let Some(v) = lookup("TODO_DB_PASSWORD") {
            self.db.password = Some(v);
        }
        if let Some(v) = lookup("TODO_DB_NAME") {
            self.db.name = v;
        }
        if let Some(v) = lookup("TODO_DB_MAX_CONNECTIONS") {
            self.db.max_connections = parse_var("TODO_DB_MAX_CONNECTIONS", v)?;
        }
        if let Some(v) = lookup("TODO_STORE") {
            self.store = match v.to_ascii_lowercase().as_str() {
                "postgres" => StoreKind::Postgres,
                "memory" => StoreKind::Memory,
                _ => {
                    return Err(ConfigError::Env {
                        var: "TODO_STORE",
                        value: v,
                        reason: "expected `postgres` or `memory`".to_string(),
                    })
                }
            };
        }
        if let Some(v) = lookup("TODO_OPERATION_TIMEOUT_MS") {
            self.operation_timeout_ms = parse_var("TODO_OPERATION_TIMEOUT_MS", v)?;
        }
        if let Some(v) = lookup("TODO_LOG_LEVEL") {
            self.log.level = v;
        }
        if let Some(v) = lookup("TODO_LOG_FORMAT") {
            self.log.format = match v.to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::Env {
                        var: "TODO_LOG_FORMAT",
                        value: v,
                        reason: "expected `text` or `json`".to_string(),
                    })
                }
            };
        }
        Ok(())
    }
}

fn parse_var<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match value.trim().parse::<T>() {
        Ok(parsed) => Ok(parsed),
        Err(e) => Err(ConfigError::Env {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}
