// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printgate — local print dispatch server
//
// Entry point. Initialises logging, loads configuration, builds the print
// engine for this host, and serves the HTTP API.

mod http;
mod state;

use std::sync::Arc;

use tokio::net::TcpListener;

use printgate_core::AppConfig;
use printgate_core::error::Result;
use printgate_print::{PrintEngine, ProcessBackend};

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        "Printgate starting"
    );

    let config = AppConfig::load()?;
    let strategy = printgate_bridge::platform_strategy(&config);
    let backend = Arc::new(ProcessBackend::new(config.process_timeout()));
    let engine = PrintEngine::new(&config, strategy, backend)?;
    engine.uploads().ensure().await?;

    let app = http::router(AppState::new(engine), config.max_upload_bytes);
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Printgate stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
