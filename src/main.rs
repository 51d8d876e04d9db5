//! App Portal - configuration-driven catalog of internal tools
//!
//! Serves the catalog API with memoized view data and a background sweeper.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app_portal::api::create_router;
use app_portal::{spawn_sweeper, AppState, Config, SweeperHandle};

/// Main entry point for the portal server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build memoized catalog accessors
/// 4. Start background memo sweeper
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app_portal=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting App Portal");

    let config = Config::from_env();
    info!(
        "Configuration loaded: config_path={}, port={}, settings_ttl={}s, catalog_ttl={}s, sweep_interval={}s, sweep_policy={:?}",
        config.config_path.display(),
        config.server_port,
        config.settings_ttl,
        config.catalog_ttl,
        config.sweep_interval,
        config.sweep_policy()
    );

    let state = AppState::from_config(&config);

    // Warm the caches; a broken document is reported but does not stop startup
    let warm = state.clone();
    match tokio::task::spawn_blocking(move || warm.catalog.call(warm.config_path.as_path())).await {
        Ok(Err(e)) => warn!(error = %e, "Initial catalog build failed"),
        Err(e) => warn!(error = %e, "Initial catalog build panicked"),
        Ok(Ok(_)) => {}
    }

    let sweeper = spawn_sweeper(
        state.registry.clone(),
        config.sweep_interval(),
        config.sweep_policy(),
    );
    info!("Background memo sweeper started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    stop_sweeper(sweeper).await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}

async fn stop_sweeper(sweeper: SweeperHandle) {
    sweeper.shutdown().await;
    info!("Memo sweeper stopped");
}
