//! API error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use employee_core::{EmployeeError, RATE_LIMIT_MESSAGE};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Error returned by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// A facade operation failed
    #[error(transparent)]
    Employee(#[from] EmployeeError),

    /// The requested value does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The facade answered with its degraded stand-in
    #[error("{0}")]
    Degraded(String),
}

impl ApiError {
    /// Not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Degraded result carrying the default throttling message
    #[must_use]
    pub fn degraded() -> Self {
        Self::Degraded(RATE_LIMIT_MESSAGE.to_string())
    }

    /// HTTP status for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Employee(error) => match error {
                EmployeeError::NotFound { .. } => StatusCode::NOT_FOUND,
                EmployeeError::Validation { .. } => StatusCode::BAD_REQUEST,
                EmployeeError::UpstreamUnavailable { .. }
                | EmployeeError::MalformedResponse { .. } => StatusCode::BAD_GATEWAY,
                e if e.is_degradable() => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Degraded(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Employee(EmployeeError::validation(rejection.body_text(), None))
    }
}

/// Error body, shaped like an error-tagged collection
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            status: "error",
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
