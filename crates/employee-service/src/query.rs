//! Derived views over the employee collection.
//!
//! Pure functions: no I/O, no shared state. Inputs are never reordered.

use employee_core::{Employee, EmployeeError, EmployeeResult};
use uuid::Uuid;

/// Number of names returned by the top-earners view
pub const TOP_EARNERS_LIMIT: usize = 10;

/// Employees whose name contains `needle`, ignoring case, in source order
#[must_use]
pub fn search_by_name(employees: &[Employee], needle: &str) -> Vec<Employee> {
    let needle = needle.to_lowercase();
    employees
        .iter()
        .filter(|employee| employee.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Employee with exactly this id.
///
/// # Errors
/// Returns `EmployeeError::NotFound` if no employee matches, including when
/// `id` is not a UUID
pub fn find_by_id(employees: &[Employee], id: &str) -> EmployeeResult<Employee> {
    let wanted = Uuid::parse_str(id.trim()).map_err(|_| EmployeeError::not_found(id))?;
    employees
        .iter()
        .find(|employee| employee.id == wanted)
        .cloned()
        .ok_or_else(|| EmployeeError::not_found(id))
}

/// Highest salary, `None` for an empty collection
#[must_use]
pub fn max_salary(employees: &[Employee]) -> Option<u32> {
    employees.iter().map(|employee| employee.salary).max()
}

/// Names of up to `n` employees by descending salary.
///
/// Every employee is ranked; ties keep source order, so employees sharing the
/// top salary are all eligible.
#[must_use]
pub fn top_earners(employees: &[Employee], n: usize) -> Vec<String> {
    let mut ranked: Vec<&Employee> = employees.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.salary.cmp(&a.salary));
    ranked
        .into_iter()
        .take(n)
        .map(|employee| employee.name.clone())
        .collect()
}
