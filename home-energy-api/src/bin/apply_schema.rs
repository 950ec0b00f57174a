use anyhow::Result;
use home_energy_api::{config::AppConfig, observability};
use home_energy_client::db;
use sqlx::postgres::PgPoolOptions;

/// Apply `sql/schema/01_homes.sql` to the configured database.
///
/// Usage:
///   apply_schema   (reads HOME_ENERGY_CONFIG like the server)
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&cfg.store.database_url()?)
        .await?;

    db::apply_schema(&pool).await?;
    tracing::info!("home schema applied");

    Ok(())
}
