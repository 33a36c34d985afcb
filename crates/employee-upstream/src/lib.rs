//! # Employee Upstream
//!
//! Client for the upstream employee data service.
//!
//! This crate provides:
//! - The `EmployeeUpstream` trait: fetch-all, create, delete
//! - `HttpUpstreamClient`, a pooled `reqwest` implementation with timeouts
//! - Wire types translating the upstream's `employee_`-prefixed fields

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod wire;

pub use client::{EmployeeUpstream, HttpUpstreamClient};
pub use wire::{WireCollection, WireEmployee};
