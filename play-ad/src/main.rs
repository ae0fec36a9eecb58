use anyhow::Result;
use std::net::SocketAddr;

use common::bootstrap;
use play_ad::{server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = bootstrap::init_settings_and_telemetry()?;
    let timezone = settings.ad_slot.tz().map_err(anyhow::Error::msg)?;
    tracing::info!(timezone = %timezone, "Starting ad slot server");

    let connections = bootstrap::connection_manager(&settings.database);
    let objects = bootstrap::init_object_store(&settings)?;

    let state = AppState::new(
        connections.clone(),
        objects,
        timezone,
        settings.object_storage.ad_url_expiry_seconds,
    );
    let app = server::create_router(state);

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));
    tracing::info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(bootstrap::shutdown_signal())
        .await?;

    connections.close().await;
    tracing::info!("Ad slot server stopped");
    Ok(())
}
