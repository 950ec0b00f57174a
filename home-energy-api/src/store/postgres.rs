use home_energy_client::{
    db::{self, RepositoryError},
    domain::{Home, HomeUsageData, NewHome, NewHomeUsageData, NewUtilityProvider, UtilityProvider},
};
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::HomeStore;
use crate::config::StoreConfig;

pub struct PgHomeStore {
    pool: PgPool,
}

impl PgHomeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from config, applying the schema first if asked to.
    pub async fn connect(cfg: &StoreConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect(&cfg.database_url()?)
            .await?;

        if cfg.apply_schema {
            db::apply_schema(&pool).await?;
            tracing::info!("home schema applied");
        }

        Ok(Self::new(pool))
    }
}

#[async_trait::async_trait]
impl HomeStore for PgHomeStore {
    async fn create_home(&self, home: NewHome) -> Result<Home, RepositoryError> {
        db::insert_home_aggregate(&self.pool, &home).await
    }

    async fn list_homes(&self) -> Result<Vec<Home>, RepositoryError> {
        db::list_homes(&self.pool).await
    }

    async fn get_home(&self, id: i32) -> Result<Home, RepositoryError> {
        db::get_home(&self.pool, id).await
    }

    async fn delete_home(&self, id: i32) -> Result<(), RepositoryError> {
        db::delete_home(&self.pool, id).await
    }

    async fn upsert_usage_data(
        &self,
        home_id: i32,
        usage: NewHomeUsageData,
    ) -> Result<HomeUsageData, RepositoryError> {
        db::upsert_usage_data(&self.pool, home_id, &usage).await
    }

    async fn add_utility_provider(
        &self,
        home_id: i32,
        provider: NewUtilityProvider,
    ) -> Result<UtilityProvider, RepositoryError> {
        db::add_utility_provider(&self.pool, home_id, &provider).await
    }

    async fn update_utility_provider(
        &self,
        id: i32,
        provider: NewUtilityProvider,
    ) -> Result<UtilityProvider, RepositoryError> {
        db::update_utility_provider(&self.pool, id, &provider).await
    }

    async fn delete_utility_provider(&self, id: i32) -> Result<(), RepositoryError> {
        db::delete_utility_provider(&self.pool, id).await
    }
}
