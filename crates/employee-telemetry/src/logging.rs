//! Structured logging setup.
//!
//! `RUST_LOG`, when set, takes precedence over the configured level so
//! operators can raise verbosity without touching the config file.

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `info` or `employee_resilience=debug,info`
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Include the event target (module path)
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default filter directive
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Switch between JSON and text output
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.format = if json { LogFormat::Json } else { LogFormat::Text };
        self
    }

    /// Show or hide event targets
    #[must_use]
    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }
}

/// Install the global subscriber.
///
/// # Errors
/// Returns an error if the filter directive does not parse or a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(&config.level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(config.with_target),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(config.with_target))
            .try_init(),
    };
    result.map_err(|e| LoggingError::Init(e.to_string()))?;

    info!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| LoggingError::InvalidFilter(e.to_string()))
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to install the subscriber
    #[error("Failed to initialize logging: {0}")]
    Init(String),
    /// The filter directive did not parse
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
}

/// Create a span for a single upstream HTTP round trip
#[macro_export]
macro_rules! upstream_span {
    ($operation:expr, $method:expr, $url:expr) => {
        tracing::info_span!(
            "upstream_call",
            operation = %$operation,
            method = %$method,
            url = %$url,
        )
    };
}

/// Create a span for a facade operation
#[macro_export]
macro_rules! operation_span {
    ($operation:expr) => {
        tracing::info_span!("facade_operation", operation = %$operation)
    };
}
