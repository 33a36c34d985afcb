//! # Employee Resilience
//!
//! Resilience patterns for the employee facade:
//! - Retry on upstream throttling with exponential backoff
//! - Circuit breaker per logical operation, with a single half-open trial
//! - Degraded fallback values per result shape
//! - Single-flight TTL cache for the employee collection

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod circuit_breaker;
pub mod fallback;
pub mod pipeline;
pub mod registry;
pub mod retry;

// Re-export main types
pub use cache::{CacheEntry, CacheStats, ResponseCache};
pub use circuit_breaker::{
    CallPermit, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStats, CircuitState,
};
pub use fallback::{recover, Fallback};
pub use pipeline::ResiliencePipeline;
pub use registry::CircuitBreakerRegistry;
pub use retry::{RetryConfig, RetryPolicy, RetryPolicyBuilder};
