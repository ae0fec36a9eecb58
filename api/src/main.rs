use anyhow::Result;
use std::net::SocketAddr;

use catalog_api::{server, AppState, RouteTable};
use common::bootstrap;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = bootstrap::init_settings_and_telemetry()?;
    tracing::info!("Starting catalog API server");

    // Routing table is checked before anything binds
    let routes = RouteTable::new()?;
    tracing::info!(routes = routes.len(), "Route table verified");

    let connections = bootstrap::connection_manager(&settings.database);
    let objects = bootstrap::init_object_store(&settings)?;

    let state = AppState::new(
        routes,
        connections.clone(),
        objects,
        settings.object_storage.clone(),
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
    tracing::info!("Catalog API server stopped");
    Ok(())
}
