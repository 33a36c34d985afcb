//! Upstream HTTP client.
//!
//! One method call is exactly one HTTP round trip. Retry, circuit breaking and
//! fallbacks live in `employee-resilience`; this layer only classifies what
//! the upstream said into `EmployeeError` kinds.

use crate::wire::{WireCollection, WireCreateBody, WireCreateResponse, WireDeleteBody};
use async_trait::async_trait;
use employee_config::UpstreamSettings;
use employee_core::{
    Employee, EmployeeCollectionResult, EmployeeCreateRequest, EmployeeError, EmployeeResult,
    Operation,
};
use employee_telemetry::upstream_span;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn, Instrument};

/// The physical operations offered by the upstream data service
#[async_trait]
pub trait EmployeeUpstream: Send + Sync {
    /// `GET /`
    async fn fetch_all(&self) -> EmployeeResult<EmployeeCollectionResult>;

    /// `POST /createEmployee`
    async fn create(&self, request: &EmployeeCreateRequest) -> EmployeeResult<Employee>;

    /// `DELETE /` with `{"name": ...}`; returns the upstream acknowledgement
    async fn delete(&self, name: &str) -> EmployeeResult<String>;
}

/// reqwest-backed upstream client with a shared connection pool
#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    client: Client,
    base_url: String,
    create_url: String,
}

impl HttpUpstreamClient {
    /// Create a new client
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(settings: &UpstreamSettings) -> EmployeeResult<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.connect_timeout)
            .pool_max_idle_per_host(settings.pool_max_idle_per_host)
            .build()
            .map_err(|e| EmployeeError::internal(format!("Failed to create HTTP client: {e}")))?;

        let base_url = settings.base_url.trim_end_matches('/').to_string();
        let create_url = format!("{base_url}/createEmployee");

        Ok(Self {
            client,
            base_url,
            create_url,
        })
    }

    /// Collection URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(operation: Operation, request: RequestBuilder) -> EmployeeResult<Response> {
        let response = request.send().await.map_err(|e| transport_error(&e))?;

        let status = response.status();
        if status.is_success() {
            debug!(operation = %operation, status = status.as_u16(), "Upstream responded");
            return Ok(response);
        }

        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await.unwrap_or_default();
        warn!(
            operation = %operation,
            status = status.as_u16(),
            body = %body,
            "Upstream returned an error status"
        );
        Err(map_status(status, retry_after, &body))
    }

    async fn read_body(response: Response) -> EmployeeResult<String> {
        response.text().await.map_err(|e| transport_error(&e))
    }
}

#[async_trait]
impl EmployeeUpstream for HttpUpstreamClient {
    async fn fetch_all(&self) -> EmployeeResult<EmployeeCollectionResult> {
        let span = upstream_span!(Operation::GetAll, "GET", self.base_url);
        async {
            let response = Self::send(Operation::GetAll, self.client.get(&self.base_url)).await?;
            let body = Self::read_body(response).await?;
            let wire: WireCollection = serde_json::from_str(&body)?;
            wire.into_result()
        }
        .instrument(span)
        .await
    }

    async fn create(&self, request: &EmployeeCreateRequest) -> EmployeeResult<Employee> {
        let span = upstream_span!(Operation::Create, "POST", self.create_url);
        async {
            let body = WireCreateBody::from(request);
            let response =
                Self::send(Operation::Create, self.client.post(&self.create_url).json(&body))
                    .await?;
            let body = Self::read_body(response).await?;
            let created: WireCreateResponse = serde_json::from_str(&body)?;
            Ok(Employee::from(created))
        }
        .instrument(span)
        .await
    }

    async fn delete(&self, name: &str) -> EmployeeResult<String> {
        let span = upstream_span!(Operation::Delete, "DELETE", self.base_url);
        async {
            let body = WireDeleteBody { name };
            let response =
                Self::send(Operation::Delete, self.client.delete(&self.base_url).json(&body))
                    .await?;
            Self::read_body(response).await
        }
        .instrument(span)
        .await
    }
}

fn transport_error(error: &reqwest::Error) -> EmployeeError {
    if error.is_timeout() {
        EmployeeError::upstream_unavailable(format!("Request timed out: {error}"), None)
    } else {
        EmployeeError::upstream_unavailable(format!("Request failed: {error}"), None)
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn map_status(status: StatusCode, retry_after: Option<Duration>, body: &str) -> EmployeeError {
    let code = status.as_u16();
    let message = if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {body}")
    };

    match code {
        429 => EmployeeError::rate_limited(retry_after),
        404 => EmployeeError::not_found(message),
        400 | 422 => EmployeeError::validation(message, None),
        _ => EmployeeError::upstream_unavailable(message, Some(code)),
    }
}
