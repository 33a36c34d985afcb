//! Logical operation names.
//!
//! Each facade operation has its own circuit breaker, keyed by this name.

use serde::Serialize;
use std::fmt;

/// A logical operation exposed by the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Fetch the whole collection
    GetAll,
    /// Case-insensitive name search
    Search,
    /// Lookup by id
    GetById,
    /// Highest salary
    MaxSalary,
    /// Names of the top earners
    TopEarners,
    /// Create an employee
    Create,
    /// Delete an employee by id
    Delete,
}

impl Operation {
    /// Every operation, in declaration order
    pub const ALL: [Self; 7] = [
        Self::GetAll,
        Self::Search,
        Self::GetById,
        Self::MaxSalary,
        Self::TopEarners,
        Self::Create,
        Self::Delete,
    ];

    /// Stable name used in logs and breaker snapshots
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetAll => "getAll",
            Self::Search => "search",
            Self::GetById => "getById",
            Self::MaxSalary => "maxSalary",
            Self::TopEarners => "topEarners",
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
