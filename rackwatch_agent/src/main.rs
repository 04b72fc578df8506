//! rackwatch_agent: serves demo telemetry for the dashboard.

use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rackwatch_agent::{build_router, parse_port, AppState, DEFAULT_PORT, LOG_ENV, SEED_ENV};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("Usage: rackwatch_agent [--port PORT|-p PORT]\nDefault port: {DEFAULT_PORT}");
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = parse_port(args, DEFAULT_PORT);
    let state = match std::env::var(SEED_ENV).ok().and_then(|s| s.parse::<u64>().ok()) {
        Some(seed) => {
            info!(seed, "using seeded random source");
            AppState::seeded(seed)
        }
        None => AppState::new(),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("telemetry agent listening on http://{addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("serving telemetry")?;
    info!("telemetry agent stopped");
    Ok(())
}
