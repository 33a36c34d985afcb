//! Configuration model.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FacadeConfig {
    /// Upstream data source.
    #[validate(nested)]
    pub upstream: UpstreamSettings,

    /// Retry-on-rate-limit policy.
    #[validate(nested)]
    pub retry: RetrySettings,

    /// Circuit breaker policy, applied per logical operation.
    #[validate(nested)]
    pub circuit_breaker: CircuitBreakerSettings,

    /// Response cache.
    pub cache: CacheSettings,

    /// HTTP server bind address.
    #[validate(nested)]
    pub server: ServerSettings,

    /// Logging.
    pub logging: LoggingSettings,
}

impl FacadeConfig {
    /// Run field validation plus the cross-field checks.
    ///
    /// # Errors
    /// Returns `ConfigError::Validation` describing the first problem found.
    pub fn check(&self) -> ConfigResult<()> {
        self.validate()?;

        let url = Url::parse(&self.upstream.base_url).map_err(|e| {
            ConfigError::Validation(format!(
                "upstream.base_url '{}' is not a valid URL: {e}",
                self.upstream.base_url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "upstream.base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        let threshold = self.circuit_breaker.failure_rate_threshold;
        if !(threshold > 0.0 && threshold <= 100.0) {
            return Err(ConfigError::Validation(format!(
                "circuit_breaker.failure_rate_threshold must be in (0, 100], got {threshold}"
            )));
        }

        if self.circuit_breaker.minimum_calls > self.circuit_breaker.sliding_window_size {
            return Err(ConfigError::Validation(format!(
                "circuit_breaker.minimum_calls ({}) exceeds sliding_window_size ({})",
                self.circuit_breaker.minimum_calls, self.circuit_breaker.sliding_window_size
            )));
        }

        if self.retry.max_delay < self.retry.base_delay {
            return Err(ConfigError::Validation(
                "retry.max_delay must not be shorter than retry.base_delay".to_string(),
            ));
        }

        if let Some(last) = self.retry.last_delay() {
            if last > self.retry.max_delay {
                return Err(ConfigError::Validation(format!(
                    "retry.max_delay ({:?}) is shorter than the last backoff delay ({last:?}); \
                     raise it or lower max_attempts, base_delay or multiplier",
                    self.retry.max_delay
                )));
            }
        }

        Ok(())
    }
}

/// Upstream data source settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpstreamSettings {
    /// Base URL of the employee collection
    #[validate(length(min = 1))]
    pub base_url: String,

    /// Whole-request timeout; a hung upstream fails after this
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// TCP connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Idle pooled connections kept per host
    #[validate(range(min = 1))]
    pub pool_max_idle_per_host: usize,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8112/api/v1/employee".to_string(),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            pool_max_idle_per_host: 10,
        }
    }
}

/// Retry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts, including the first
    #[validate(range(min = 1, max = 20))]
    pub max_attempts: u32,

    /// Delay before the first retry
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,

    /// Backoff multiplier
    #[validate(range(min = 1.0))]
    pub multiplier: f64,

    /// Cap for any single delay
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
}

impl RetrySettings {
    /// Delay before the final attempt, `base_delay * multiplier^(max_attempts - 2)`.
    ///
    /// `None` when a single attempt never sleeps.
    #[must_use]
    pub fn last_delay(&self) -> Option<Duration> {
        let retries = self.max_attempts.checked_sub(1).filter(|n| *n > 0)?;
        let exponent = i32::try_from(retries - 1).unwrap_or(i32::MAX);
        let secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(3000),
            multiplier: 2.0,
            max_delay: Duration::from_secs(60),
        }
    }
}

/// Circuit breaker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CircuitBreakerSettings {
    /// Failure percentage at which the breaker opens
    pub failure_rate_threshold: f64,

    /// Number of most recent calls the failure rate is computed over
    #[validate(range(min = 1))]
    pub sliding_window_size: u32,

    /// Calls that must be recorded before the rate is considered
    #[validate(range(min = 1))]
    pub minimum_calls: u32,

    /// How long an open breaker rejects calls before admitting a trial
    #[serde(with = "humantime_serde")]
    pub cool_down: Duration,
}

impl Default for CircuitBreakerSettings {
    fn default() -> Self {
        Self {
            failure_rate_threshold: 50.0,
            sliding_window_size: 10,
            minimum_calls: 5,
            cool_down: Duration::from_secs(30),
        }
    }
}

/// Cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// How long a fetched collection stays valid; zero disables caching
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
        }
    }
}

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind host
    #[validate(length(min = 1))]
    pub host: String,

    /// Bind port
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8111,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
