//! smd-charts - chart-data service of the Sentiment Metric Dashboard
//!
//! Reads the event store read-only and serves the flow diagram plus the
//! sibling dashboard charts as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use smd_charts::cli::Args;
use smd_charts::{build_router, AppState};
use smd_common::config::{load_optional_config, ServiceConfig};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("smd_charts=info,tower_http=info")),
        )
        .init();

    // Log build identification before any database work
    info!(
        "Starting SMD chart service (smd-charts) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let file = load_optional_config(args.config.as_deref()).context("Failed to load config file")?;
    let config = ServiceConfig::resolve(&args.overrides(), file).context("Invalid configuration")?;

    info!("Database path: {}", config.database.display());
    let pool = match smd_common::db::connect_readonly(&config.database).await {
        Ok(pool) => {
            info!("✓ Connected to database (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!(
        depth = ?config.flow.depth,
        topic_limit = config.flow.topic_limit,
        include_neutral = config.flow.include_neutral,
        "Flow defaults"
    );

    let state = AppState::new(pool, config.flow.clone());
    let app = build_router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("smd-charts listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("smd-charts stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
