//! Shutdown signal handling.

use tokio::signal;
use tracing::{error, info};

/// Resolves when the process receives Ctrl-C or, on unix, SIGTERM.
///
/// Returns the name of the signal. A handler that cannot be installed is
/// logged and never fires; the other one still does.
pub async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        "ctrl+c"
    };

    #[cfg(unix)]
    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
        "sigterm"
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<&'static str>();

    let signal_name = tokio::select! {
        name = ctrl_c => name,
        name = sigterm => name,
    };

    info!(signal = signal_name, "Received shutdown signal");
    signal_name
}
