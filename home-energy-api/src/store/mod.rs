//! Persistence seam for the home aggregate.

pub mod memory;
pub mod postgres;

use home_energy_client::{
    db::RepositoryError,
    domain::{Home, HomeUsageData, NewHome, NewHomeUsageData, NewUtilityProvider, UtilityProvider},
};

pub use memory::InMemoryHomeStore;
pub use postgres::PgHomeStore;

/// Storage for homes and their children.
///
/// `create_home` is all-or-nothing: either the home and every submitted
/// child become visible together, or nothing does. Reads always return homes
/// with their children attached.
#[async_trait::async_trait]
pub trait HomeStore: Send + Sync {
    async fn create_home(&self, home: NewHome) -> Result<Home, RepositoryError>;

    async fn list_homes(&self) -> Result<Vec<Home>, RepositoryError>;

    async fn get_home(&self, id: i32) -> Result<Home, RepositoryError>;

    async fn delete_home(&self, id: i32) -> Result<(), RepositoryError>;

    async fn upsert_usage_data(
        &self,
        home_id: i32,
        usage: NewHomeUsageData,
    ) -> Result<HomeUsageData, RepositoryError>;

    async fn add_utility_provider(
        &self,
        home_id: i32,
        provider: NewUtilityProvider,
    ) -> Result<UtilityProvider, RepositoryError>;

    async fn update_utility_provider(
        &self,
        id: i32,
        provider: NewUtilityProvider,
    ) -> Result<UtilityProvider, RepositoryError>;

    async fn delete_utility_provider(&self, id: i32) -> Result<(), RepositoryError>;
}
