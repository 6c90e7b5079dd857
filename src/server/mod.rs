//! HTTP server for exposing a [`QueryExecutor`](crate::executor::QueryExecutor)
//!
//! The exposure is optional: the executor itself is transport-agnostic and
//! is usually called in-process. This module only wires it to an Axum router
//! following the GraphQL-over-HTTP conventions.

pub mod exposure;

pub use exposure::GraphQLExposure;

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
pub(crate) async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
