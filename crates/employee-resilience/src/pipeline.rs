//! Composition of retry, circuit breaker and fallback.
//!
//! The order is fixed: the breaker guards the whole retried call, and the
//! fallback wraps the breaker.
//!
//! ```text
//! recover( breaker(op)( retry( upstream call ) ) )
//! ```
//!
//! A logical call therefore records one outcome in its breaker no matter how
//! many attempts the retry policy made.

use crate::circuit_breaker::CircuitBreaker;
use crate::fallback::{recover, Fallback};
use crate::registry::CircuitBreakerRegistry;
use crate::retry::RetryPolicy;
use employee_core::{EmployeeResult, Operation};
use std::future::Future;
use std::sync::Arc;

/// Resilience policy applied to every upstream-call path
#[derive(Debug, Clone)]
pub struct ResiliencePipeline {
    retry: RetryPolicy,
    breakers: Arc<CircuitBreakerRegistry>,
}

impl ResiliencePipeline {
    /// Create a pipeline
    #[must_use]
    pub fn new(retry: RetryPolicy, breakers: Arc<CircuitBreakerRegistry>) -> Self {
        Self { retry, breakers }
    }

    /// Breakers used by this pipeline
    #[must_use]
    pub fn breakers(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.breakers
    }

    /// Breaker for one operation
    #[must_use]
    pub fn breaker(&self, operation: Operation) -> Arc<CircuitBreaker> {
        self.breakers.get_or_create(operation)
    }

    /// Physical upstream call: breaker, retry and fallback.
    ///
    /// # Errors
    /// Returns non-degradable errors (unavailable, malformed, not found, validation)
    pub async fn call<T, F, Fut>(&self, operation: Operation, f: F) -> EmployeeResult<T>
    where
        T: Fallback,
        F: Fn() -> Fut,
        Fut: Future<Output = EmployeeResult<T>>,
    {
        let breaker = self.breaker(operation);
        let result = breaker
            .execute(|| self.retry.execute(operation, f))
            .await;
        recover(operation, result)
    }

    /// Derived or composite call: breaker and fallback, no retry.
    ///
    /// # Errors
    /// Returns non-degradable errors unchanged
    pub async fn guard<T, F, Fut>(&self, operation: Operation, f: F) -> EmployeeResult<T>
    where
        T: Fallback,
        F: FnOnce() -> Fut,
        Fut: Future<Output = EmployeeResult<T>>,
    {
        let breaker = self.breaker(operation);
        let result = breaker.execute(f).await;
        recover(operation, result)
    }

    /// Retry only, for a physical call nested inside a [`guard`](Self::guard).
    ///
    /// # Errors
    /// Returns the first non-retryable error or the last throttling error
    pub async fn retrying<T, F, Fut>(&self, operation: Operation, f: F) -> EmployeeResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = EmployeeResult<T>>,
    {
        self.retry.execute(operation, f).await
    }
}
