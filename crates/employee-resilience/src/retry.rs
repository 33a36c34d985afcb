//! Retry policy with exponential backoff.
//!
//! Only throttling (`RateLimited`) is retried. The backoff sleep suspends the
//! calling task only.

use employee_config::RetrySettings;
use employee_core::{EmployeeError, EmployeeResult, Operation};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(3000),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            base_delay: settings.base_delay,
            max_delay: settings.max_delay,
            multiplier: settings.multiplier,
        }
    }
}

/// Retry policy implementation
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy with the given configuration
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(RetryConfig::default())
    }

    /// Delay before retry number `retry` (0-indexed): `base * multiplier^retry`,
    /// capped at `max_delay`
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let base = self.config.base_delay.as_millis() as f64;
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let delay = base * self.config.multiplier.powi(exponent);
        let delay = delay.min(self.config.max_delay.as_millis() as f64);
        Duration::from_millis(delay as u64)
    }

    /// Check if an error is retryable
    #[must_use]
    pub fn is_retryable(&self, error: &EmployeeError) -> bool {
        error.is_retryable()
    }

    /// Execute an operation, retrying on throttling.
    ///
    /// # Errors
    /// Returns the first non-retryable error, or the last throttling error
    /// once `max_attempts` attempts have been made
    pub async fn execute<F, Fut, T>(&self, operation: Operation, f: F) -> EmployeeResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = EmployeeResult<T>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match f().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(operation = %operation, attempt, "Retry succeeded");
                    }
                    return Ok(result);
                }
                Err(error) if !self.is_retryable(&error) => return Err(error),
                Err(error) if attempt >= max_attempts => {
                    warn!(
                        operation = %operation,
                        attempts = attempt,
                        error = %error,
                        "Retries exhausted"
                    );
                    return Err(error);
                }
                Err(error) => {
                    let delay = self.delay_for_retry(attempt - 1);
                    warn!(
                        operation = %operation,
                        attempt,
                        max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "Retrying after error"
                    );

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

/// Builder for retry policy
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    config: RetryConfig,
}

impl RetryPolicyBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set total attempts
    #[must_use]
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.config.max_attempts = n;
        self
    }

    /// Set base delay
    #[must_use]
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.base_delay = delay;
        self
    }

    /// Set max delay
    #[must_use]
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.max_delay = delay;
        self
    }

    /// Set backoff multiplier
    #[must_use]
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.config.multiplier = multiplier;
        self
    }

    /// Build the policy
    #[must_use]
    pub fn build(self) -> RetryPolicy {
        RetryPolicy::new(self.config)
    }
}
