//! Employee records and the collection result.
//!
//! Records are immutable once parsed from an upstream response; create and
//! delete produce new upstream state rather than editing an instance.

use crate::error::{EmployeeError, EmployeeResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Message carried by collection fallbacks
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded";

/// An employee as returned by the upstream service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Identity assigned by the upstream
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Salary
    pub salary: u32,
    /// Age
    pub age: u32,
    /// Job title
    pub title: String,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Employee {
    /// Degraded stand-in returned by single-employee operations
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            id: Uuid::nil(),
            name: String::new(),
            salary: 0,
            age: 0,
            title: String::new(),
            email: None,
        }
    }

    /// Whether this is the degraded stand-in
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.id.is_nil() && self.name.is_empty()
    }
}

/// Fields a caller may submit to create an employee
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EmployeeCreateRequest {
    /// Display name
    #[serde(default)]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    /// Salary
    #[serde(default)]
    #[validate(required(message = "salary is required"))]
    pub salary: Option<u32>,

    /// Age
    #[serde(default)]
    #[validate(
        required(message = "age is required"),
        range(min = 1, message = "age must be positive")
    )]
    pub age: Option<u32>,

    /// Job title
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,

    /// Email address (optional, may be empty)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl EmployeeCreateRequest {
    /// Create a request with all required fields
    pub fn new(name: impl Into<String>, salary: u32, age: u32, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            salary: Some(salary),
            age: Some(age),
            title: title.into(),
            email: None,
        }
    }

    /// Set the email address
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Trim text fields and check required fields are present.
    ///
    /// # Errors
    /// Returns `EmployeeError::Validation` naming the first offending field
    pub fn validated(mut self) -> EmployeeResult<Self> {
        self.name = self.name.trim().to_string();
        self.title = self.title.trim().to_string();
        self.validate()?;
        Ok(self)
    }
}

/// Status marker of a collection result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStatus {
    /// Data was fetched
    Ok,
    /// Data is absent; see the error message
    Error,
}

/// A sequence of employees, or an error status with a message, never both
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeCollectionResult {
    data: Vec<Employee>,
    status: CollectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl EmployeeCollectionResult {
    /// Successful result
    #[must_use]
    pub fn ok(data: Vec<Employee>) -> Self {
        Self {
            data,
            status: CollectionStatus::Ok,
            error: None,
        }
    }

    /// Error-tagged result with no data
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            status: CollectionStatus::Error,
            error: Some(message.into()),
        }
    }

    /// The fallback used when a collection read is throttled or short-circuited
    #[must_use]
    pub fn rate_limited() -> Self {
        Self::error(RATE_LIMIT_MESSAGE)
    }

    /// Employees (empty when error-tagged)
    #[must_use]
    pub fn data(&self) -> &[Employee] {
        &self.data
    }

    /// Status marker
    #[must_use]
    pub fn status(&self) -> CollectionStatus {
        self.status
    }

    /// Error message, present only when error-tagged
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the result carries data
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == CollectionStatus::Ok
    }

    /// Unwrap the data, turning an error tag into `EmployeeError::Degraded`
    ///
    /// # Errors
    /// Returns `EmployeeError::Degraded` if the result is error-tagged
    pub fn into_employees(self) -> EmployeeResult<Vec<Employee>> {
        match self.status {
            CollectionStatus::Ok => Ok(self.data),
            CollectionStatus::Error => Err(EmployeeError::degraded(
                self.error.unwrap_or_else(|| RATE_LIMIT_MESSAGE.to_string()),
            )),
        }
    }
}
