//! HTTP server for the statistics endpoint.
//!
//! Runs on a separate tokio task and serves `GET /stats` with the
//! rendered report. Plain HTTP, no authentication, no caching headers.

use axum::extract::State;
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::state::StatsStore;

/// Handler for GET /stats - renders the current statistics snapshot.
async fn stats_handler(State(stats): State<Arc<StatsStore>>) -> String {
    stats.render()
}

/// Run the HTTP server for the statistics endpoint.
///
/// Binds to `0.0.0.0:port`. This is a long-running task that should be
/// spawned in the background; bind or serve failures are logged, never
/// fatal to event processing.
pub async fn run_http_server(port: u16, stats: Arc<StatsStore>) {
    let app = Router::new()
        .route("/stats", get(stats_handler))
        .with_state(stats);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Statistics HTTP server listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind HTTP server on {}: {}", addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("HTTP server error: {}", e);
    }
}
