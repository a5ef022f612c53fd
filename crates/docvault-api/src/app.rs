//! Application builder. Wires the store, content storage, services and router into an Axum app.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tracing::{error, info, warn};

use docvault_core::config::{AppConfig, DatabaseProvider};
use docvault_core::error::AppError;
use docvault_database::{DatabasePool, MemoryRegistryStore, PostgresStore, RegistryStore};
use docvault_storage::manager::StorageManager;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Builds the shared state from configuration: registry store, content
/// store, and services.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    // ── Step 1: Create data directories ──────────────────────────
    tokio::fs::create_dir_all(&config.storage.data_root)
        .await
        .map_err(|e| {
            AppError::configuration(format!(
                "Failed to create data root '{}': {e}",
                config.storage.data_root
            ))
        })?;

    // ── Step 2: Registry store ───────────────────────────────────
    let store: Arc<dyn RegistryStore> = match config.database.provider {
        DatabaseProvider::Postgres => {
            info!("Connecting to registry database...");
            let db = DatabasePool::connect(&config.database).await?;
            Arc::new(PostgresStore::new(db))
        }
        DatabaseProvider::Memory => {
            warn!("Using the in-memory registry store; data is lost on restart");
            Arc::new(MemoryRegistryStore::new())
        }
    };
    info!(backend = store.backend(), "Registry store ready");

    // ── Step 3: Content store ────────────────────────────────────
    info!(
        provider = %config.storage.default_provider,
        "Initializing content store..."
    );
    let storage_manager = Arc::new(StorageManager::from_config(&config.storage).await?);

    // ── Step 4: Services ─────────────────────────────────────────
    AppState::new(config, store, storage_manager)
}

/// Runs the DocVault server until a shutdown signal arrives.
///
/// In-flight requests get `server.shutdown_grace_seconds` to finish.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting DocVault v{}", env!("CARGO_PKG_VERSION"));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = build_state(config).await?;
    let store = state.store.clone();
    let app = build_app(state);

    // ── Step 5: Bind and serve ───────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("DocVault server listening on {}", addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.changed().await;
    });
    let mut server = tokio::spawn(server.into_future());

    let outcome = tokio::select! {
        result = &mut server => flatten_server_result(result),
        _ = shutdown_signal() => {
            info!(grace_seconds = grace.as_secs(), "Shutdown signal received, draining requests");
            let _ = shutdown_tx.send(true);
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => flatten_server_result(result),
                Err(_) => {
                    warn!("Grace period elapsed with requests still in flight");
                    server.abort();
                    Ok(())
                }
            }
        }
    };

    // ── Step 6: Release the registry ─────────────────────────────
    store.close().await;

    info!("DocVault server stopped");
    outcome
}

fn flatten_server_result(
    result: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), AppError> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(AppError::internal(format!("Server error: {e}"))),
        Err(e) => Err(AppError::internal(format!("Server task failed: {e}"))),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
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
}
