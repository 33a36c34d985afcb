//! Per-operation circuit breakers.

use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStats};
use dashmap::DashMap;
use employee_core::Operation;
use std::sync::Arc;

/// Lazily created circuit breakers, one per logical operation
#[derive(Debug)]
pub struct CircuitBreakerRegistry {
    config: CircuitBreakerConfig,
    breakers: DashMap<Operation, Arc<CircuitBreaker>>,
}

impl CircuitBreakerRegistry {
    /// Create an empty registry; every breaker shares `config`
    #[must_use]
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            breakers: DashMap::new(),
        }
    }

    /// Get the breaker for `operation`, creating it on first use
    #[must_use]
    pub fn get_or_create(&self, operation: Operation) -> Arc<CircuitBreaker> {
        self.breakers
            .entry(operation)
            .or_insert_with(|| Arc::new(CircuitBreaker::new(operation, self.config.clone())))
            .clone()
    }

    /// Statistics for every operation, in declaration order.
    ///
    /// Operations that have not been called yet report a fresh closed breaker.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CircuitBreakerStats> {
        Operation::ALL
            .iter()
            .map(|operation| self.get_or_create(*operation).stats())
            .collect()
    }

    /// Reset every breaker to closed
    pub fn reset_all(&self) {
        for breaker in &self.breakers {
            breaker.value().reset();
        }
    }
}

impl Default for CircuitBreakerRegistry {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}
