//! OS signal handling.

/// Resolve when the process receives Ctrl+C / SIGINT.
///
/// If the handler cannot be installed the future never resolves, so the
/// service keeps running instead of shutting down spuriously.
pub async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(err) => {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
