//! Process shutdown signals

use tokio::signal::unix::{signal, SignalKind};

/// Resolves on SIGTERM or SIGINT
pub async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGTERM handler, waiting for Ctrl-C only");
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM - shutting down");
        }
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => tracing::info!("Received SIGINT - shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                sigterm.recv().await;
            }
        },
    }
}
