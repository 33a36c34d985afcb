//! # Employee Core
//!
//! Core types and error handling for the employee facade.
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Employee records and create requests
//! - The collection result returned by list-shaped operations
//! - The error taxonomy shared by the upstream client, resilience layer and facade
//! - Logical operation names used to key circuit breakers

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod employee;
pub mod error;
pub mod operation;

// Re-export commonly used types
pub use employee::{
    CollectionStatus, Employee, EmployeeCollectionResult, EmployeeCreateRequest,
    RATE_LIMIT_MESSAGE,
};
pub use error::{EmployeeError, EmployeeResult};
pub use operation::Operation;
