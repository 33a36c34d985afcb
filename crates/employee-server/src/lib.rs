//! # Employee Server
//!
//! HTTP adapter for the employee facade.
//!
//! This crate provides:
//! - Axum routes under `/api/v1/employee`
//! - Error to status mapping
//! - Health and circuit breaker introspection endpoints
//! - Graceful shutdown on Ctrl-C and SIGTERM

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod state;

// Re-export main types
pub use error::ApiError;
pub use routes::{create_router, EMPLOYEE_BASE_PATH};
pub use server::Server;
pub use shutdown::shutdown_signal;
pub use state::AppState;
