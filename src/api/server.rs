use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{
    services::{download, health, ping},
    state::AppState,
};
use crate::config::Config;
use crate::extractor::YtDlp;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Builds the application router. Shared with the integration tests so
/// they exercise the same routes and middleware as production.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/download", post(download))
        .route("/health", get(health))
        .route("/ping", get(ping))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Runs the HTTP server until a shutdown signal arrives.
///
/// `address` overrides the configured bind address when given (CLI
/// flag); otherwise config and the `PORT` environment variable decide.
pub async fn run(address: Option<SocketAddr>) -> Result<(), AnyError> {
    info!("Loading configuration");
    let mut config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;

    if let Some(address) = address {
        config.server.bind_addr = address;
    }

    let extractor = YtDlp::new(config.extractor.clone());
    let state = AppState::new(config, Arc::new(extractor));
    let address = state.config.server.bind_addr;

    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "vidbox API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
