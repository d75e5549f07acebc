// api-gateway/src/main.rs

//! API gateway binary.
//!
//! This binary exposes a small HTTP API on top of the `ledger` crate:
//!
//! - `GET /health`
//! - `POST /issue`
//! - `POST /verify`
//! - `GET /chain`
//!
//! It embeds a single in-memory `SharedLedger` (lost on restart) and a
//! Prometheus metrics exporter on `/metrics`.

mod app;
mod config;
mod routes;
mod state;

use std::sync::Arc;

use tokio::signal;

use config::ApiConfig;
use ledger::{LedgerConfig, MetricsRegistry, SharedLedger, run_prometheus_http_server};
use state::AppState;

#[tokio::main]
async fn main() {
    // Basic tracing setup.
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "api_gateway=info,ledger=info,tower_http=info".to_string()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let api_cfg = ApiConfig::from_env().map_err(|e| e.to_string())?;
    let ledger_cfg = LedgerConfig::from_env().map_err(|e| e.to_string())?;

    // ---------------------------
    // Metrics
    // ---------------------------

    let metrics = Arc::new(
        MetricsRegistry::new()
            .map_err(|e| format!("failed to initialise metrics registry: {e}"))?,
    );

    if ledger_cfg.metrics.enabled {
        let metrics_clone = metrics.clone();
        let addr = ledger_cfg.metrics.listen_addr;
        tokio::spawn(async move {
            if let Err(e) = run_prometheus_http_server(metrics_clone, addr).await {
                tracing::error!("metrics HTTP server error: {e}");
            }
        });
        tracing::info!("metrics exporter listening on http://{}/metrics", addr);
    }

    // ---------------------------
    // Ledger + shared state
    // ---------------------------

    let ledger = SharedLedger::new().with_metrics(metrics.ledger.clone());
    tracing::info!(blocks = ledger.len(), "ledger initialised with genesis block");

    let app = app::router(AppState::new(ledger));

    // ---------------------------
    // axum 0.8 server (hyper 1 / tokio 1.48 style)
    // ---------------------------

    tracing::info!("API gateway listening on http://{}", api_cfg.listen_addr);

    let listener = tokio::net::TcpListener::bind(api_cfg.listen_addr)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", api_cfg.listen_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("API server error: {e}"))?;

    Ok(())
}

/// Waits for Ctrl-C and returns, used for graceful shutdown.
async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
