//! OS signal handling.
//!
//! SIGINT and SIGTERM both trigger graceful shutdown.

use crate::lifecycle::Shutdown;

/// Wait for SIGINT or SIGTERM, then trigger `shutdown`.
pub async fn shutdown_on_signal(shutdown: Shutdown) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!(signal = "SIGINT", "Shutdown signal received"),
        _ = terminate => tracing::info!(signal = "SIGTERM", "Shutdown signal received"),
        _ = shutdown.wait() => return,
    }
    shutdown.trigger();
}
