//! # Employee Service
//!
//! The employee facade consumed by the HTTP layer.
//!
//! This crate provides:
//! - The query engine: name search, lookup by id, max salary, top earners
//! - `EmployeeService`, which serves every operation through the response
//!   cache and the resilience pipeline

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod query;
pub mod service;

pub use query::TOP_EARNERS_LIMIT;
pub use service::{EmployeeService, EmployeeServiceBuilder};
