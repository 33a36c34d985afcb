//! Integration tests for the employee facade
//!
//! This crate drives the full stack against a `wiremock` upstream:
//! - Response caching and single-flight fetches
//! - Retry exhaustion and fallback values
//! - Circuit breaker opening, cool-down and trial calls
//! - Create and delete flows
//! - The HTTP API over a real socket

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
pub use fixtures::*;
pub use helpers::*;

#[cfg(test)]
mod api_tests;
#[cfg(test)]
mod cache_tests;
#[cfg(test)]
mod write_tests;
