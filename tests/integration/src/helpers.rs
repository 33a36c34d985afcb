//! Test helper utilities for integration tests

use crate::fixtures::collection_body;
use employee_config::FacadeConfig;
use employee_server::{AppState, Server};
use employee_service::EmployeeService;
use employee_upstream::WireEmployee;
use once_cell::sync::Lazy;
use reqwest::{Client, Response};
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path of the employee collection, upstream and facade alike
pub const BASE_PATH: &str = employee_server::EMPLOYEE_BASE_PATH;

/// Breaker cool-down used by [`fast_config`]
pub const TEST_COOL_DOWN: Duration = Duration::from_millis(100);

/// Initialize tracing for tests (only once)
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
});

/// Initialize tracing for tests
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// A `wiremock` stand-in for the upstream employee service
pub struct UpstreamMock {
    server: MockServer,
}

impl UpstreamMock {
    /// Start an upstream with nothing mounted
    pub async fn start() -> Self {
        init_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    /// The underlying mock server
    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Base URL the facade should be configured with
    pub fn base_url(&self) -> String {
        format!("{}{}", self.server.uri(), BASE_PATH)
    }

    /// Serve `employees` from `GET /`, expecting exactly `times` fetches
    pub async fn serve_roster(&self, employees: &[WireEmployee], times: u64) {
        Mock::given(method("GET"))
            .and(path(BASE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(collection_body(employees)))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Answer the next `times` fetches with `status`.
    ///
    /// Later fetches fall through to mocks mounted afterwards.
    pub async fn fail_fetches(&self, status: u16, times: u64) {
        Mock::given(method("GET"))
            .and(path(BASE_PATH))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(times)
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Number of requests the upstream has received
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}

/// Configuration with millisecond retry delays and a short cool-down.
///
/// Three attempts per call; the breaker opens once two of the last four
/// calls have failed.
pub fn fast_config(base_url: &str) -> FacadeConfig {
    let mut config = FacadeConfig::default();
    config.upstream.base_url = base_url.to_string();
    config.upstream.request_timeout = Duration::from_secs(2);
    config.retry.max_attempts = 3;
    config.retry.base_delay = Duration::from_millis(1);
    config.retry.max_delay = Duration::from_millis(10);
    config.circuit_breaker.sliding_window_size = 4;
    config.circuit_breaker.minimum_calls = 2;
    config.circuit_breaker.cool_down = TEST_COOL_DOWN;
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config
}

/// Facade service wired to the upstream in `config`
pub fn build_service(config: &FacadeConfig) -> EmployeeService {
    config.check().expect("test config is valid");
    EmployeeService::from_config(config).expect("Failed to build service")
}

/// The facade served over a real socket
pub struct TestServer {
    /// The server address
    pub addr: SocketAddr,
    /// HTTP client for making requests
    pub client: Client,
    /// Base URL for the server
    pub base_url: String,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<std::io::Result<()>>>,
}

impl TestServer {
    /// Serve `service` on an ephemeral local port
    pub async fn start(config: &FacadeConfig, service: EmployeeService) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get local addr");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let server = Server::new(config.server.clone(), AppState::new(service));
        let handle = tokio::spawn(server.serve(listener, async {
            let _ = shutdown_rx.await;
        }));

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create client");

        Self {
            addr,
            client,
            base_url: format!("http://{addr}"),
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Get the full URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed")
    }

    /// Make a POST request with a JSON body
    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Request failed")
    }

    /// Read a response body as JSON
    pub async fn json_body(response: Response) -> Value {
        response.json().await.expect("Failed to parse JSON")
    }

    /// Trigger graceful shutdown and wait for the server to stop
    pub async fn shutdown(mut self) -> std::io::Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.await.expect("server task panicked"),
            None => Ok(()),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Assert response status code
pub fn assert_status(response: &Response, expected: u16) {
    assert_eq!(
        response.status().as_u16(),
        expected,
        "Expected status {}, got {}",
        expected,
        response.status()
    );
}
