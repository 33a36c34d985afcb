//! # Employee Config
//!
//! Configuration for the employee facade: upstream location, retry and
//! circuit-breaker policy, cache TTL, server bind address and logging.
//!
//! Configuration is layered: defaults, then an optional YAML or TOML file,
//! then `EMPLOYEE_FACADE_*` environment overrides, then validation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod loader;

pub use config::{
    CacheSettings, CircuitBreakerSettings, FacadeConfig, LoggingSettings, RetrySettings,
    ServerSettings, UpstreamSettings,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::{apply_env_overrides, load_config, CONFIG_PATH_ENV};
