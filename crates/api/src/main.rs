use anyhow::Result;
use std::time::Duration;
use tracing::info;

use ordens_servico_api::app::create_app;
use ordens_servico_api::config::Config;
use ordens_servico_api::jobs::{JobScheduler, SessionCleanupJob};
use ordens_servico_api::middleware::{init_metrics, logging::init_logging};
use persistence::Store;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_logging(&config.logging);
    init_metrics();

    info!("Starting Ordens de Serviço v{}", env!("CARGO_PKG_VERSION"));

    let store = if config.store.seed {
        info!(units = config.store.units.len(), "Loading seed data");
        Store::seeded(config.store.units.clone())
    } else {
        Store::new(config.store.units.clone())
    };

    let mut scheduler = JobScheduler::new();
    scheduler.register(SessionCleanupJob::new(
        store.clone(),
        Duration::from_secs(15 * 60),
    ));
    scheduler.start();

    let app = create_app(config.clone(), store);

    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown(Duration::from_secs(5)).await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
