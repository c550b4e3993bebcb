//! # Ventas API server binary
//!
//! ```bash
//! VENTAS_DB_PATH=./ventas.db VENTAS_HTTP_PORT=8080 cargo run -p ventas-api
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use ventas_api::{build_router, init_tracing, ApiConfig, AppState};
use ventas_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Ventas API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        addr = %config.socket_addr(),
        db_path = %config.db_path,
        "Configuration loaded"
    );

    // Open database (runs migrations)
    let db_config = DbConfig::new(&config.db_path).max_connections(config.db_max_connections);
    if db_config.is_in_memory() {
        warn!("Using an in-memory database; data is lost on shutdown");
    }
    let db = Database::new(db_config)
        .await
        .with_context(|| format!("opening database at {}", config.db_path))?;
    info!("Database ready");

    let app = build_router(AppState::new(db.clone()));

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
