//! # Employee Telemetry
//!
//! Structured logging for the employee facade.
//!
//! This crate provides:
//! - `init_logging`, installing a `tracing-subscriber` registry with an env filter
//! - Human-readable or JSON output
//! - Span macros for upstream calls and facade operations

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingError};
