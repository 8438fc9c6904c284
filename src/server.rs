use crate::{routes, state};
use anyhow::Context;
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal, task::JoinSet};
use tokio_util::sync::CancellationToken;

pub async fn bind(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    let addr = format!("{host}:{port}");
    TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))
}

/// Serves until Ctrl+C or SIGTERM, then shuts down gracefully. Open event
/// streams are ended so that the graceful shutdown can complete.
pub async fn run_until_done(bind: TcpListener) -> anyhow::Result<()> {
    let mut join_set = JoinSet::new();
    let shutdown_signal = CancellationToken::new();
    // register ctrl+c signal
    {
        let shutdown_signal = shutdown_signal.clone();
        join_set.spawn(async move {
            match signal::ctrl_c().await {
                Ok(_) => tracing::debug!("Received Ctrl+C, start terminating"),
                Err(err) => tracing::error!(reason = ?err, "Failed to listen for Ctrl+C"),
            }
            shutdown_signal.cancel();
        });
    }
    #[cfg(unix)]
    {
        let shutdown_signal = shutdown_signal.clone();
        join_set.spawn(async move {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                    tracing::debug!("Received SIGTERM signal, start terminating");
                    shutdown_signal.cancel();
                }
                Err(err) => tracing::error!(reason = ?err, "Failed to install SIGTERM handler"),
            }
        });
    }
    let addr = bind.local_addr()?;
    let state = state::AppState::build(shutdown_signal.clone());
    let routes = routes::build().with_state(state);
    tracing::info!("Listening on http://{}", addr);
    axum::serve(
        bind,
        routes.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal.cancelled_owned())
    .await
    .context("Server error")?;
    join_set.shutdown().await;
    tracing::info!("Server stopped");
    Ok(())
}
