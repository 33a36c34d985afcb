//! Degraded fallback values.
//!
//! Throttling, an open circuit and an already-degraded collection never reach
//! the caller as errors. Each result shape has a stand-in value instead.

use employee_core::{Employee, EmployeeCollectionResult, EmployeeResult, Operation};
use tracing::warn;

/// A result shape with a degraded stand-in value
pub trait Fallback {
    /// The stand-in value
    fn fallback() -> Self;
}

impl Fallback for EmployeeCollectionResult {
    fn fallback() -> Self {
        Self::rate_limited()
    }
}

impl Fallback for Employee {
    fn fallback() -> Self {
        Self::placeholder()
    }
}

/// Delete acknowledgement
impl Fallback for String {
    fn fallback() -> Self {
        Self::new()
    }
}

/// Highest salary; `None` doubles as the "no data" marker
impl Fallback for Option<u32> {
    fn fallback() -> Self {
        None
    }
}

/// Top earner names
impl Fallback for Vec<String> {
    fn fallback() -> Self {
        Self::new()
    }
}

/// Replace a degradable error with the shape's fallback.
///
/// Every substitution is logged; other errors pass through unchanged.
///
/// # Errors
/// Returns `result`'s error when it is not degradable
pub fn recover<T: Fallback>(operation: Operation, result: EmployeeResult<T>) -> EmployeeResult<T> {
    match result {
        Err(error) if error.is_degradable() => {
            warn!(
                operation = %operation,
                kind = error.kind(),
                error = %error,
                "Returning fallback value"
            );
            Ok(T::fallback())
        }
        other => other,
    }
}
