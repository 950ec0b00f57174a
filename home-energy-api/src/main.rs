use anyhow::Result;
use home_energy_api::{
    config::{AppConfig, StoreKind},
    location::ZippopotamResolver,
    metrics_server,
    observability,
    routes::{self, AppState},
    store::{HomeStore, InMemoryHomeStore, PgHomeStore},
};
use std::{net::SocketAddr, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let store: Arc<dyn HomeStore> = match cfg.store.kind {
        StoreKind::Postgres => Arc::new(PgHomeStore::connect(&cfg.store).await?),
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Arc::new(InMemoryHomeStore::new())
        }
    };

    let resolver = Arc::new(ZippopotamResolver::new(&cfg.location)?);
    let app = routes::router(AppState::new(store, resolver));

    let addr: SocketAddr = cfg
        .server
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind_addr: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "home energy api listening");

    axum::serve(listener, app).await?;

    Ok(())
}
