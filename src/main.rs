//! # Employee Facade
//!
//! Resilient HTTP facade over an upstream employee data service.
//!
//! ## Features
//!
//! - Retry with exponential backoff on upstream throttling
//! - Per-operation circuit breakers
//! - Single-flight response cache
//! - Degraded fallback values instead of throttling errors
//!
//! ## Usage
//!
//! ```bash
//! # Start with default configuration
//! employee-facade
//!
//! # Start with a config file
//! employee-facade --config /path/to/config.yaml
//!
//! # Start with environment overrides
//! EMPLOYEE_FACADE_PORT=9000 employee-facade
//!
//! # Validate configuration and exit
//! employee-facade --config config.toml --check
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use employee_config::{load_config, CONFIG_PATH_ENV};
use employee_server::{AppState, Server};
use employee_service::EmployeeService;
use employee_telemetry::{init_logging, LoggingConfig};
use std::path::PathBuf;
use tracing::{error, info};

/// Employee Facade - resilient front for the employee service
#[derive(Parser, Debug)]
#[command(name = "employee-facade")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (.yaml, .yml or .toml)
    #[arg(short, long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,

    /// Validate configuration and exit
    #[arg(long)]
    check: bool,
}

/// Application entry point
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = ?e, "Application failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())
        .await
        .context("failed to load configuration")?;

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let logging = LoggingConfig::new()
        .with_level(config.logging.level.clone())
        .with_json(config.logging.json || cli.json_logs);
    init_logging(&logging).context("failed to initialize logging")?;

    if cli.check {
        info!("Configuration is valid");
        return Ok(());
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        upstream = %config.upstream.base_url,
        "Starting employee facade"
    );

    let service = EmployeeService::from_config(&config).context("failed to build service")?;
    let server = Server::new(config.server.clone(), AppState::new(service));

    info!(address = %server.bind_address(), "Binding");
    server.run().await.context("server failed")?;

    Ok(())
}
