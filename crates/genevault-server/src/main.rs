//! GeneVault Server - Main entry point

use anyhow::{Context, Result};
use genevault_common::logging::{init_logging, LogConfig};
use std::{net::SocketAddr, time::Duration};
use tokio::signal;
use tracing::info;

use genevault_server::{api, config::Config, db};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("genevault-server")
        .filter_directives("genevault_server=debug,tower_http=debug,sqlx=warn")
        .build()
        .merge_env()?;

    init_logging(&log_config)?;

    info!("Starting GeneVault Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}",
        config.bind_address()
    );

    let db_pool = db::create_pool(&config.database)
        .await
        .context("Failed to connect to database")?;
    db::health_check(&db_pool).await?;

    db::run_migrations(&db_pool).await?;
    info!("Database migrations completed");

    let app = api::create_router(db_pool, &config);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Drain window for in-flight requests, capped at 5 seconds.
    info!("Waiting up to {} seconds for connections to close", timeout_secs.min(5));
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
