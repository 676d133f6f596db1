//! groupwardend - the abuse-mitigation daemon.
//!
//! Reads inbound chat events as JSON lines on stdin (pushed by an
//! external transport process) and emits outbound sends as JSON lines on
//! stdout. Serves group/member statistics over HTTP.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use groupwarden::config::Config;
use groupwarden::engine::Engine;
use groupwarden::http;
use groupwarden::transport::{BridgeInput, BridgeTransport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration; with no explicit path, a missing config.toml
    // just means defaults.
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).map_err(|e| {
            error!(path = %path, error = %e, "Failed to load config");
            e
        })?,
        None if std::path::Path::new("config.toml").exists() => Config::load("config.toml")?,
        None => {
            info!("No config.toml found, using defaults");
            Config::default()
        }
    };

    info!(
        window_ms = config.engine.window_ms,
        warn = config.engine.warn_threshold,
        notify = config.engine.notify_threshold,
        scope = ?config.engine.tracker_scope,
        "Starting groupwardend"
    );

    let stats_port = config.http.stats_port;
    let transport = Arc::new(BridgeTransport::new());
    let engine = Arc::new(Engine::new(config, Arc::clone(&transport))?);

    // Statistics endpoint is optional.
    // Convention: stats_port = 0 disables it (used by tests).
    if stats_port == 0 {
        info!("Statistics endpoint disabled");
    } else {
        let stats = engine.stats();
        tokio::spawn(async move {
            http::run_http_server(stats_port, stats).await;
        });
        info!(port = stats_port, "Statistics HTTP server started");
    }

    // Event loop: one line, one bridge input. Each message event is
    // processed on its own task so a slow transport call never stalls
    // the stream; per-sender state stays consistent via the tracker's
    // internal locking.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<BridgeInput>(&line) {
            Ok(BridgeInput::Message(event)) => {
                let engine = Arc::clone(&engine);
                tokio::spawn(async move {
                    engine.handle_message(event).await;
                });
            }
            Ok(BridgeInput::Members { group_id, members }) => {
                transport.update_members(group_id, members);
            }
            Err(e) => {
                warn!(error = %e, "dropping undecodable input line");
            }
        }
    }

    info!("Transport stream closed, shutting down");
    Ok(())
}
