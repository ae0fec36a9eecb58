// Bootstrap utilities shared by the catalog and ad-slot binaries

use crate::config::{DatabaseConfig, Settings};
use crate::db::ConnectionManager;
use crate::storage::{ObjectStore, S3ObjectStore};
use crate::telemetry;
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::info;

static CONNECTIONS: OnceCell<Arc<ConnectionManager>> = OnceCell::new();

/// Load and validate settings, then start logging and (optionally) metrics
pub fn init_settings_and_telemetry() -> Result<Settings> {
    let settings = Settings::load().context("Failed to load configuration")?;
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    telemetry::init_logging(
        &settings.observability.log_level,
        settings.observability.json_logs,
    )?;
    if let Some(port) = settings.observability.metrics_port {
        telemetry::init_metrics(port)?;
    }

    info!(
        host = %settings.server.host,
        port = settings.server.port,
        database = %settings.database.display_url(),
        bucket = %settings.object_storage.bucket,
        "Configuration loaded"
    );
    Ok(settings)
}

/// Process-wide connection manager.
///
/// The first caller's configuration wins; later calls get the same manager
/// and therefore the same pool.
pub fn connection_manager(config: &DatabaseConfig) -> Arc<ConnectionManager> {
    CONNECTIONS
        .get_or_init(|| Arc::new(ConnectionManager::new(config.clone())))
        .clone()
}

/// Initialize the object storage client
#[tracing::instrument(skip(settings))]
pub fn init_object_store(settings: &Settings) -> Result<Arc<dyn ObjectStore>> {
    let store = S3ObjectStore::new(&settings.object_storage)
        .context("Failed to initialize object storage client")?;
    Ok(Arc::new(store))
}

/// Resolves when the process receives Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Initiating graceful shutdown");
}
