//! Upstream wire format.
//!
//! The upstream prefixes every employee field with `employee_`; these types
//! exist only to translate that shape into the domain types.

use employee_core::{Employee, EmployeeCollectionResult, EmployeeCreateRequest, EmployeeError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Employee as serialized by the upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireEmployee {
    /// Identity
    pub id: Uuid,
    /// Display name
    pub employee_name: String,
    /// Salary
    pub employee_salary: u32,
    /// Age
    pub employee_age: u32,
    /// Job title
    pub employee_title: String,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_email: Option<String>,
}

impl From<WireEmployee> for Employee {
    fn from(wire: WireEmployee) -> Self {
        Self {
            id: wire.id,
            name: wire.employee_name,
            salary: wire.employee_salary,
            age: wire.employee_age,
            title: wire.employee_title,
            email: wire.employee_email,
        }
    }
}

impl From<&Employee> for WireEmployee {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            employee_name: employee.name.clone(),
            employee_salary: employee.salary,
            employee_age: employee.age,
            employee_title: employee.title.clone(),
            employee_email: employee.email.clone(),
        }
    }
}

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireCollection {
    /// Employees, absent on upstream errors
    #[serde(default)]
    pub data: Option<Vec<WireEmployee>>,
    /// Upstream status text
    #[serde(default)]
    pub status: Option<String>,
    /// Upstream error message
    #[serde(default)]
    pub error: Option<String>,
}

impl WireCollection {
    /// Convert into the domain collection.
    ///
    /// # Errors
    /// A body without data is `UpstreamUnavailable` when the upstream gave a
    /// reason, `MalformedResponse` otherwise.
    pub fn into_result(self) -> Result<EmployeeCollectionResult, EmployeeError> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(EmployeeCollectionResult::ok(
                data.into_iter().map(Employee::from).collect(),
            )),
            (None, Some(message)) => Err(EmployeeError::upstream_unavailable(message, None)),
            (None, None) => Err(EmployeeError::malformed(
                "collection response has neither data nor error",
            )),
        }
    }
}

/// Body of `POST /createEmployee`
#[derive(Debug, Clone, Serialize)]
pub struct WireCreateBody<'a> {
    /// Display name
    pub name: &'a str,
    /// Salary
    pub salary: Option<u32>,
    /// Age
    pub age: Option<u32>,
    /// Job title
    pub title: &'a str,
    /// Email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
}

impl<'a> From<&'a EmployeeCreateRequest> for WireCreateBody<'a> {
    fn from(request: &'a EmployeeCreateRequest) -> Self {
        Self {
            name: &request.name,
            salary: request.salary,
            age: request.age,
            title: &request.title,
            email: request.email.as_deref(),
        }
    }
}

/// Create response, either bare or wrapped in `{data, status}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireCreateResponse {
    /// `{"data": {...}, "status": "..."}`
    Wrapped {
        /// Created employee
        data: WireEmployee,
    },
    /// The employee object itself
    Bare(WireEmployee),
}

impl From<WireCreateResponse> for Employee {
    fn from(response: WireCreateResponse) -> Self {
        match response {
            WireCreateResponse::Wrapped { data } | WireCreateResponse::Bare(data) => data.into(),
        }
    }
}

/// Body of `DELETE /`
#[derive(Debug, Clone, Serialize)]
pub struct WireDeleteBody<'a> {
    /// Name of the employee to delete
    pub name: &'a str,
}
