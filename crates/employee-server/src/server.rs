//! HTTP server lifecycle.

use employee_config::ServerSettings;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use crate::{routes::create_router, shutdown::shutdown_signal, state::AppState};

/// The employee facade HTTP server
#[derive(Debug)]
pub struct Server {
    settings: ServerSettings,
    state: AppState,
}

impl Server {
    /// Create a server
    #[must_use]
    pub fn new(settings: ServerSettings, state: AppState) -> Self {
        Self { settings, state }
    }

    /// Configured bind address, `host:port`
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.settings.host, self.settings.port)
    }

    /// Bind the configured address and serve until Ctrl-C or SIGTERM
    ///
    /// # Errors
    /// Returns error if the address cannot be bound or serving fails
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.bind_address()).await?;
        self.serve(listener, async {
            shutdown_signal().await;
        })
        .await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// In-flight requests are allowed to finish before this returns.
    ///
    /// # Errors
    /// Returns error if serving fails
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr: SocketAddr = listener.local_addr()?;
        info!(address = %local_addr, "Employee facade listening");

        let app = create_router(self.state);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}
