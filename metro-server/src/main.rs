use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use metro_server::cache::CachedPlanner;
use metro_server::config::ServerConfig;
use metro_server::network::{GraphSnapshot, load_edges};
use metro_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "metro_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let fares = config.load_fares()?;

    info!(path = %config.data_path.display(), "loading network");
    let rows = load_edges(&config.data_path)?;
    let snapshot = GraphSnapshot::build(rows, fares.bands().to_vec())?;

    if snapshot.registry.is_empty() {
        warn!("network has no stations; every query will fail");
    }

    let planner = CachedPlanner::new(Arc::new(snapshot), config.search.clone(), &config.cache);
    let app = create_router(AppState::new(planner));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "metro planner listening");
    info!("endpoints: /health /api/stations /api/stations/lookup /api/route/shortest /api/route/interchanges /api/fares /api/fare");

    axum::serve(listener, app).await?;
    Ok(())
}
