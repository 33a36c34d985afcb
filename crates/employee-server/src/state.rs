//! Shared application state.

use employee_service::EmployeeService;
use std::sync::Arc;
use std::time::Instant;

/// State handed to every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    /// The employee facade
    pub service: Arc<EmployeeService>,
    /// When the server started
    pub started_at: Instant,
}

impl AppState {
    /// Create state around a service
    #[must_use]
    pub fn new(service: EmployeeService) -> Self {
        Self {
            service: Arc::new(service),
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was created
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
