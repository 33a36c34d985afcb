//! Sample upstream payloads

use employee_core::Employee;
use employee_upstream::WireEmployee;
use serde_json::{json, Value};
use uuid::Uuid;

/// Status text the upstream puts on successful responses
pub const UPSTREAM_OK: &str = "Successfully processed request.";

/// An upstream employee with a random id
pub fn wire_employee(name: &str, salary: u32) -> WireEmployee {
    WireEmployee {
        id: Uuid::new_v4(),
        employee_name: name.to_string(),
        employee_salary: salary,
        employee_age: 35,
        employee_title: "Engineer".to_string(),
        employee_email: Some(format!("{}@company.com", name.to_lowercase().replace(' ', "."))),
    }
}

/// Twelve employees with distinct salaries; "Tiger Nixon" earns the most
pub fn sample_roster() -> Vec<WireEmployee> {
    let names = [
        "Tiger Nixon",
        "Garrett Winters",
        "Ashton Cox",
        "Cedric Kelly",
        "Airi Satou",
        "Brielle Williamson",
        "Herrod Chandler",
        "Rhona Davidson",
        "Colleen Hurst",
        "Sonya Frost",
        "Jena Gaines",
        "Quinn Flynn",
    ];
    names
        .iter()
        .enumerate()
        .map(|(i, name)| wire_employee(name, 320_800 - (i as u32) * 10_000))
        .collect()
}

/// `GET /` response body for `employees`
pub fn collection_body(employees: &[WireEmployee]) -> Value {
    json!({
        "data": employees,
        "status": UPSTREAM_OK,
    })
}

/// `POST /createEmployee` response body, wrapped as the upstream sends it
pub fn created_body(employee: &WireEmployee) -> Value {
    json!({
        "data": employee,
        "status": UPSTREAM_OK,
    })
}

/// `DELETE /` response body
pub fn deleted_body() -> Value {
    json!({
        "data": true,
        "status": UPSTREAM_OK,
    })
}

/// Domain view of a wire employee
pub fn domain(employee: &WireEmployee) -> Employee {
    Employee::from(employee.clone())
}
