//! Error types for the employee facade.
//!
//! A single taxonomy is shared by every layer so that the resilience wrapper
//! can classify failures without knowing which component produced them.

use std::time::Duration;
use thiserror::Error;

/// Result alias used across the workspace
pub type EmployeeResult<T> = Result<T, EmployeeError>;

/// Errors produced by the upstream client, the resilience layer and the facade
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmployeeError {
    /// No employee matches the requested id
    #[error("Employee not found: {resource}")]
    NotFound {
        /// What was looked up (usually the id)
        resource: String,
    },

    /// Upstream signaled throttling (HTTP 429)
    #[error("Upstream rate limit exceeded")]
    RateLimited {
        /// Retry-After hint, if the upstream sent one
        retry_after: Option<Duration>,
    },

    /// Upstream could not be reached, timed out, or answered with a server error
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable {
        /// Error message
        message: String,
        /// HTTP status, when a response was received
        status_code: Option<u16>,
    },

    /// Upstream body did not match the expected shape
    #[error("Malformed upstream response: {message}")]
    MalformedResponse {
        /// Error message
        message: String,
    },

    /// Caller-supplied input is missing required fields
    #[error("Validation error: {message}")]
    Validation {
        /// Error message
        message: String,
        /// Offending field, if known
        field: Option<String>,
    },

    /// The circuit breaker for an operation is rejecting calls
    #[error("Circuit breaker open for operation '{operation}'")]
    CircuitOpen {
        /// Logical operation name
        operation: String,
    },

    /// The employee collection was itself a fallback value
    #[error("Degraded result: {message}")]
    Degraded {
        /// Message carried by the degraded collection
        message: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Anything else
    #[error("Internal error: {message}")]
    Internal {
        /// Error message
        message: String,
    },
}

impl EmployeeError {
    /// Create a not-found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a rate-limited error
    #[must_use]
    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self::RateLimited { retry_after }
    }

    /// Create an upstream-unavailable error
    pub fn upstream_unavailable(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
            status_code,
        }
    }

    /// Create a malformed-response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>, field: Option<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field,
        }
    }

    /// Create a circuit-open error
    pub fn circuit_open(operation: impl Into<String>) -> Self {
        Self::CircuitOpen {
            operation: operation.into(),
        }
    }

    /// Create a degraded-result error
    pub fn degraded(message: impl Into<String>) -> Self {
        Self::Degraded {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used in logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::RateLimited { .. } => "rate_limited",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Validation { .. } => "validation",
            Self::CircuitOpen { .. } => "circuit_open",
            Self::Degraded { .. } => "degraded",
            Self::Configuration { .. } => "configuration",
            Self::Internal { .. } => "internal",
        }
    }

    /// Only throttling is retried; everything else propagates immediately
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Errors that are replaced by a fallback value instead of reaching the caller
    #[must_use]
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::CircuitOpen { .. } | Self::Degraded { .. }
        )
    }

    /// Upstream-side failures tracked by the circuit breaker.
    ///
    /// Caller errors (not found, validation) mean the upstream answered and
    /// are not held against it. `Degraded` is a fallback inherited from a
    /// call whose own breaker already recorded the failure.
    #[must_use]
    pub fn counts_as_failure(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::UpstreamUnavailable { .. }
                | Self::MalformedResponse { .. }
        )
    }
}

impl From<validator::ValidationErrors> for EmployeeError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .min()
            .map(ToString::to_string);
        Self::Validation {
            message: errors.to_string(),
            field,
        }
    }
}

impl From<serde_json::Error> for EmployeeError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}
