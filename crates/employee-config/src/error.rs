//! Configuration error types.

use std::path::PathBuf;

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Config file extension is not yaml, yml or toml.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// YAML parse failure.
    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parse failure.
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value for {key}: {message}")]
    InvalidEnv {
        /// Variable name
        key: String,
        /// What was wrong
        message: String,
    },

    /// Validation failed.
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}
