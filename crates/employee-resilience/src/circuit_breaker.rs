//! Circuit breaker pattern implementation.
//!
//! The breaker tracks the outcome of the most recent calls for one logical
//! operation. When the failure rate over that window reaches the threshold it
//! opens and rejects calls for the cool-down period, then admits a single
//! trial call whose outcome decides between closing and reopening.

use employee_config::CircuitBreakerSettings;
use employee_core::{EmployeeError, EmployeeResult, Operation};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Circuit is closed, requests flow normally
    Closed,
    /// Circuit is open, requests are rejected
    Open,
    /// Circuit is half-open, a single trial request is allowed
    HalfOpen,
}

/// Circuit breaker configuration
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Failure percentage (0-100] at which the circuit opens
    pub failure_rate_threshold: f64,
    /// Number of most recent calls the failure rate is computed over
    pub sliding_window_size: u32,
    /// Calls that must be recorded before the failure rate is considered
    pub minimum_calls: u32,
    /// Time to wait before admitting a trial call
    pub cool_down: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_rate_threshold: 50.0,
            sliding_window_size: 10,
            minimum_calls: 5,
            cool_down: Duration::from_secs(30),
        }
    }
}

impl From<&CircuitBreakerSettings> for CircuitBreakerConfig {
    fn from(settings: &CircuitBreakerSettings) -> Self {
        Self {
            failure_rate_threshold: settings.failure_rate_threshold,
            sliding_window_size: settings.sliding_window_size,
            minimum_calls: settings.minimum_calls,
            cool_down: settings.cool_down,
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    /// `true` marks a failure
    window: VecDeque<bool>,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

impl Inner {
    fn failures(&self) -> usize {
        self.window.iter().filter(|failed| **failed).count()
    }

    #[allow(clippy::cast_precision_loss)]
    fn failure_rate(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else {
            self.failures() as f64 * 100.0 / self.window.len() as f64
        }
    }
}

/// Circuit breaker for a single logical operation
#[derive(Debug)]
pub struct CircuitBreaker {
    operation: Operation,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker
    #[must_use]
    pub fn new(operation: Operation, config: CircuitBreakerConfig) -> Self {
        let capacity = usize::try_from(config.sliding_window_size).unwrap_or(0);
        Self {
            operation,
            config,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                window: VecDeque::with_capacity(capacity),
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    /// Create with default configuration
    #[must_use]
    pub fn with_defaults(operation: Operation) -> Self {
        Self::new(operation, CircuitBreakerConfig::default())
    }

    /// The operation this breaker guards
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Get the current state
    #[must_use]
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    /// Ask for permission to make a call.
    ///
    /// An open circuit whose cool-down has elapsed moves to half-open and the
    /// caller becomes the trial; while the trial is in flight every other
    /// caller is rejected.
    ///
    /// # Errors
    /// Returns `EmployeeError::CircuitOpen` if the call must not proceed
    pub fn try_acquire(&self) -> EmployeeResult<CallPermit<'_>> {
        let mut inner = self.inner.lock();

        match inner.state {
            CircuitState::Closed => Ok(CallPermit::new(self, false)),
            CircuitState::Open => {
                let cooled = inner
                    .opened_at
                    .is_some_and(|opened| opened.elapsed() >= self.config.cool_down);
                if cooled {
                    inner.state = CircuitState::HalfOpen;
                    inner.trial_in_flight = true;
                    info!(operation = %self.operation, "Circuit breaker half-open, admitting trial");
                    Ok(CallPermit::new(self, true))
                } else {
                    Err(EmployeeError::circuit_open(self.operation.as_str()))
                }
            }
            CircuitState::HalfOpen => {
                if inner.trial_in_flight {
                    Err(EmployeeError::circuit_open(self.operation.as_str()))
                } else {
                    inner.trial_in_flight = true;
                    Ok(CallPermit::new(self, true))
                }
            }
        }
    }

    /// Run `f` under the breaker.
    ///
    /// Errors that count as upstream failures are recorded as failures;
    /// everything else, including caller errors, is recorded as success.
    ///
    /// # Errors
    /// Returns `EmployeeError::CircuitOpen` without calling `f` if rejected,
    /// otherwise whatever `f` returns
    pub async fn execute<F, Fut, T>(&self, f: F) -> EmployeeResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = EmployeeResult<T>>,
    {
        let permit = self.try_acquire()?;
        let result = f().await;
        match &result {
            Err(error) if error.counts_as_failure() => permit.record_failure(),
            _ => permit.record_success(),
        }
        result
    }

    fn on_outcome(&self, trial: bool, failed: bool) {
        let mut inner = self.inner.lock();

        if trial {
            inner.trial_in_flight = false;
            if inner.state != CircuitState::HalfOpen {
                return;
            }
            if failed {
                inner.state = CircuitState::Open;
                inner.opened_at = Some(Instant::now());
                warn!(operation = %self.operation, "Circuit breaker trial failed, reopening");
            } else {
                inner.state = CircuitState::Closed;
                inner.window.clear();
                inner.opened_at = None;
                info!(operation = %self.operation, "Circuit breaker closed");
            }
            return;
        }

        // Calls admitted before the circuit opened do not affect it afterwards
        if inner.state != CircuitState::Closed {
            return;
        }

        let window_size = usize::try_from(self.config.sliding_window_size).unwrap_or(usize::MAX);
        inner.window.push_back(failed);
        while inner.window.len() > window_size {
            inner.window.pop_front();
        }

        let minimum_calls = usize::try_from(self.config.minimum_calls).unwrap_or(usize::MAX);
        let rate = inner.failure_rate();
        if inner.window.len() >= minimum_calls && rate >= self.config.failure_rate_threshold {
            inner.state = CircuitState::Open;
            inner.opened_at = Some(Instant::now());
            warn!(
                operation = %self.operation,
                failure_rate = rate,
                threshold = self.config.failure_rate_threshold,
                "Circuit breaker opened"
            );
        } else if failed {
            debug!(operation = %self.operation, failure_rate = rate, "Circuit breaker recorded failure");
        }
    }

    fn release_trial(&self) {
        let mut inner = self.inner.lock();
        inner.trial_in_flight = false;
        debug!(operation = %self.operation, "Circuit breaker trial abandoned");
    }

    /// Reset the circuit breaker to closed state
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.state = CircuitState::Closed;
        inner.window.clear();
        inner.opened_at = None;
        inner.trial_in_flight = false;
        info!(operation = %self.operation, "Circuit breaker reset");
    }

    /// Force the circuit open (for testing or manual intervention)
    pub fn force_open(&self) {
        let mut inner = self.inner.lock();
        inner.state = CircuitState::Open;
        inner.opened_at = Some(Instant::now());
        inner.trial_in_flight = false;
        warn!(operation = %self.operation, "Circuit breaker forced open");
    }

    /// Get current statistics
    #[must_use]
    pub fn stats(&self) -> CircuitBreakerStats {
        let inner = self.inner.lock();
        CircuitBreakerStats {
            operation: self.operation,
            state: inner.state,
            calls: u32::try_from(inner.window.len()).unwrap_or(u32::MAX),
            failures: u32::try_from(inner.failures()).unwrap_or(u32::MAX),
            failure_rate: inner.failure_rate(),
        }
    }
}

/// Permission to make one call through a breaker.
///
/// Dropping an unsettled trial permit (for example because the caller's
/// future was cancelled) frees the half-open slot for the next caller.
#[derive(Debug)]
#[must_use = "a permit must be settled with record_success or record_failure"]
pub struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl<'a> CallPermit<'a> {
    fn new(breaker: &'a CircuitBreaker, trial: bool) -> Self {
        Self {
            breaker,
            trial,
            settled: false,
        }
    }

    /// Whether this is the half-open trial
    #[must_use]
    pub fn is_trial(&self) -> bool {
        self.trial
    }

    /// Record a successful call
    pub fn record_success(mut self) {
        self.settled = true;
        self.breaker.on_outcome(self.trial, false);
    }

    /// Record a failed call
    pub fn record_failure(mut self) {
        self.settled = true;
        self.breaker.on_outcome(self.trial, true);
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if self.trial && !self.settled {
            self.breaker.release_trial();
        }
    }
}

/// Circuit breaker statistics
#[derive(Debug, Clone, Serialize)]
pub struct CircuitBreakerStats {
    /// Guarded operation
    pub operation: Operation,
    /// Current state
    pub state: CircuitState,
    /// Calls currently in the window
    pub calls: u32,
    /// Failures currently in the window
    pub failures: u32,
    /// Failure percentage over the window
    pub failure_rate: f64,
}
