//! Server configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use envlog_types::DEFAULT_BLOCK_SIZE;

use crate::query::DEFAULT_HISTORY_WINDOW;

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP settings.
    pub server: ServerConfig,
    /// Storage settings.
    pub storage: StorageConfig,
    /// History view settings.
    pub history: HistoryConfig,
}

impl Config {
    /// Load configuration from the default path, or defaults if it doesn't exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_or_default(default_config_path())
    }

    /// Load configuration from a file, or defaults if it doesn't exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return every problem found.
    ///
    /// # Example
    ///
    /// ```
    /// use envlog_service::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.server.validate());
        errors.extend(self.storage.validate());
        errors.extend(self.history.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8081").
    pub bind: String,
    /// Source served by the bare `/temp` route.
    pub default_source: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8081".to_string(),
            default_source: "office".to_string(),
        }
    }
}

impl ServerConfig {
    /// Validate server configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        match self.bind.rsplit_once(':') {
            _ if self.bind.is_empty() => {
                errors.push(ValidationError::new(
                    "server.bind",
                    "bind address cannot be empty",
                ));
            }
            None => {
                errors.push(ValidationError::new(
                    "server.bind",
                    format!(
                        "invalid bind address '{}': expected format 'host:port'",
                        self.bind
                    ),
                ));
            }
            Some((_, port)) => match port.parse::<u16>() {
                Ok(0) => errors.push(ValidationError::new("server.bind", "port cannot be 0")),
                Err(_) => errors.push(ValidationError::new(
                    "server.bind",
                    format!("invalid port '{}': must be a number 1-65535", port),
                )),
                Ok(_) if self.bind.parse::<SocketAddr>().is_err() => {
                    errors.push(ValidationError::new(
                        "server.bind",
                        format!(
                            "invalid bind address '{}': host must be an IP address",
                            self.bind
                        ),
                    ))
                }
                Ok(_) => {}
            },
        }

        if self.default_source.trim().is_empty() {
            errors.push(ValidationError::new(
                "server.default_source",
                "default source cannot be empty",
            ));
        }

        errors
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: envlog_store::default_db_path(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        if self.path.as_os_str().is_empty() {
            vec![ValidationError::new(
                "storage.path",
                "database path cannot be empty",
            )]
        } else {
            Vec::new()
        }
    }
}

/// History view configuration.
///
/// Only the number of rows read is tunable; the averaging block size is fixed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Number of most recent rows read per source.
    pub window: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_HISTORY_WINDOW,
        }
    }
}

impl HistoryConfig {
    /// Validate history configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        if (self.window as usize) < DEFAULT_BLOCK_SIZE {
            vec![ValidationError::new(
                "history.window",
                format!(
                    "window {} is smaller than one averaging block ({} rows)",
                    self.window, DEFAULT_BLOCK_SIZE
                ),
            )]
        } else {
            Vec::new()
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `server.bind`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("envlog")
        .join("server.toml")
}
