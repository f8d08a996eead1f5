use std::future::Future;

use actix_web::dev::Server;
use anyhow::Context;
use tokio::signal;
use tracing::{error, info, warn};

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("🛑 Ctrl+C received, shutting down contact API...")
        },
        _ = terminate => {
            warn!("🛑 SIGTERM received, shutting down contact API...");
        }
    }
}

/// Runs `server` until it exits on its own or `shutdown` resolves. On
/// shutdown, in-flight requests are drained before returning.
pub async fn serve_until<F>(server: Server, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let handle = server.handle();
    let mut server = tokio::spawn(server);

    tokio::select! {
        res = &mut server => {
            return res.context("HTTP server task failed")?.context("HTTP server failed");
        }
        _ = shutdown => {
            info!("Draining in-flight requests");
        }
    }

    handle.stop(true).await;
    server
        .await
        .context("HTTP server task failed")?
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}
