//! Route definitions for the employee API.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Prefix of every employee route
pub const EMPLOYEE_BASE_PATH: &str = "/api/v1/employee";

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(handlers::health_check))
        // Admin endpoints
        .nest("/admin", admin_routes())
        // Employee endpoints
        .nest(EMPLOYEE_BASE_PATH, employee_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Employee routes, relative to [`EMPLOYEE_BASE_PATH`].
///
/// The static segments are matched before `:id`.
fn employee_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::get_all_employees).post(handlers::create_employee),
        )
        .route("/search/:search", get(handlers::search_employees))
        .route("/highestSalary", get(handlers::highest_salary))
        .route(
            "/topTenHighestEarningEmployeeNames",
            get(handlers::top_ten_earners),
        )
        .route(
            "/:id",
            get(handlers::get_employee).delete(handlers::delete_employee),
        )
}

/// Admin/introspection routes
fn admin_routes() -> Router<AppState> {
    Router::new().route("/circuits", get(handlers::circuits))
}
