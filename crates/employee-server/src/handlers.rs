//! HTTP request handlers.
//!
//! Handlers are thin: each one calls a single facade operation and maps
//! degraded stand-ins to `503 Service Unavailable`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use employee_core::{Employee, EmployeeCreateRequest};
use employee_resilience::{CacheStats, CircuitBreakerStats};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{error::ApiError, state::AppState};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}

/// Resilience introspection response
#[derive(Debug, Serialize)]
pub struct CircuitsResponse {
    /// One entry per operation
    pub circuits: Vec<CircuitBreakerStats>,
    /// Response cache counters
    pub cache: CacheStats,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Circuit breaker states and cache counters
pub async fn circuits(State(state): State<AppState>) -> Json<CircuitsResponse> {
    Json(CircuitsResponse {
        circuits: state.service.circuit_snapshot(),
        cache: state.service.cache_stats(),
    })
}

/// `GET /api/v1/employee`
#[instrument(skip(state))]
pub async fn get_all_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    info!("Fetching all employees");
    let employees = state.service.get_all_employees().await?.into_employees()?;
    Ok(Json(employees))
}

/// `GET /api/v1/employee/search/:search`
#[instrument(skip(state))]
pub async fn search_employees(
    State(state): State<AppState>,
    Path(search): Path<String>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees = state
        .service
        .get_employees_by_name(&search)
        .await?
        .into_employees()?;
    debug!(matches = employees.len(), "Search complete");
    Ok(Json(employees))
}

/// `GET /api/v1/employee/:id`
#[instrument(skip(state))]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, ApiError> {
    let employee = state.service.get_employee_by_id(&id).await?;
    if employee.is_placeholder() {
        return Err(ApiError::degraded());
    }
    Ok(Json(employee))
}

/// `GET /api/v1/employee/highestSalary`
#[instrument(skip(state))]
pub async fn highest_salary(State(state): State<AppState>) -> Result<Json<u32>, ApiError> {
    state
        .service
        .get_highest_salary_of_employees()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("no salary data"))
}

/// `GET /api/v1/employee/topTenHighestEarningEmployeeNames`
#[instrument(skip(state))]
pub async fn top_ten_earners(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let names = state
        .service
        .get_top_ten_highest_earning_employee_names()
        .await?;
    Ok(Json(names))
}

/// `POST /api/v1/employee`
#[instrument(skip_all)]
pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeCreateRequest>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    let Json(request) = payload?;
    let employee = state.service.create_employee(request).await?;
    if employee.is_placeholder() {
        return Err(ApiError::degraded());
    }
    Ok(Json(employee))
}

/// `DELETE /api/v1/employee/:id`
#[instrument(skip(state))]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<String>, ApiError> {
    let ack = state.service.delete_employee_by_id(&id).await?;
    if ack.is_empty() {
        return Err(ApiError::degraded());
    }
    Ok(Json(ack))
}
