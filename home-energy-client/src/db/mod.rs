//! Postgres persistence for the home aggregate.
//!
//! Tables (see `sql/schema/01_homes.sql`):
//! - `homes`
//! - `home_usage_data` (one row per home, cascades on home delete)
//! - `utility_providers` (many rows per home, cascades on home delete)

pub mod home_queries;

use std::collections::HashMap;

use sqlx::PgPool;
use thiserror::Error;

use crate::domain::{Home, HomeUsageData, UtilityProvider};

pub use home_queries::{
    add_utility_provider, delete_home, delete_utility_provider, get_home, insert_home_aggregate,
    list_homes, update_utility_provider, upsert_usage_data,
};

pub const SCHEMA: &str = include_str!("../../sql/schema/01_homes.sql");

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
}

impl RepositoryError {
    pub fn home_not_found(id: i32) -> Self {
        Self::NotFound { entity: "home", id }
    }

    pub fn utility_provider_not_found(id: i32) -> Self {
        Self::NotFound {
            entity: "utility provider",
            id,
        }
    }
}

/// Apply the bundled schema. Every statement is idempotent.
pub async fn apply_schema(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Root columns of the `homes` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct HomeRow {
    pub id: i32,
    pub owner_last_name: String,
    pub street_address: String,
    pub city: String,
}

impl HomeRow {
    /// Attach children. An empty provider list is reported as absent.
    pub fn into_home(
        self,
        usage: Option<HomeUsageData>,
        providers: Vec<UtilityProvider>,
    ) -> Home {
        Home {
            id: self.id,
            owner_last_name: self.owner_last_name,
            street_address: self.street_address,
            city: self.city,
            home_usage_data: usage,
            utility_providers: (!providers.is_empty()).then_some(providers),
        }
    }
}

impl From<&Home> for HomeRow {
    fn from(home: &Home) -> Self {
        Self {
            id: home.id,
            owner_last_name: home.owner_last_name.clone(),
            street_address: home.street_address.clone(),
            city: home.city.clone(),
        }
    }
}

/// Join child rows onto their homes by `home_id`.
///
/// Home order is kept; providers keep their relative order within each home.
/// Children whose home is not in `homes` are dropped.
pub fn assemble_homes(
    homes: Vec<HomeRow>,
    usage: Vec<HomeUsageData>,
    providers: Vec<UtilityProvider>,
) -> Vec<Home> {
    let mut usage_by_home: HashMap<i32, HomeUsageData> =
        usage.into_iter().map(|u| (u.home_id, u)).collect();

    let mut providers_by_home: HashMap<i32, Vec<UtilityProvider>> = HashMap::new();
    for p in providers {
        providers_by_home.entry(p.home_id).or_default().push(p);
    }

    homes
        .into_iter()
        .map(|row| {
            let usage = usage_by_home.remove(&row.id);
            let providers = providers_by_home.remove(&row.id).unwrap_or_default();
            row.into_home(usage, providers)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32) -> HomeRow {
        HomeRow {
            id,
            owner_last_name: format!("Owner{id}"),
            street_address: format!("{id} Test St."),
            city: "Test City".to_string(),
        }
    }

    fn provider(id: i32, home_id: i32, labels: &[&str]) -> UtilityProvider {
        UtilityProvider {
            id,
            provided_utilities: labels.iter().map(|s| s.to_string()).collect(),
            home_id,
        }
    }

    #[test]
    fn assemble_attaches_children_to_their_home() {
        let usage = vec![HomeUsageData {
            id: 10,
            monthly_electric_usage: Some(123.0),
            has_solar: true,
            home_id: 2,
        }];
        let providers = vec![
            provider(20, 2, &["Gas"]),
            provider(21, 1, &["Water"]),
            provider(22, 2, &["Electric", "Gas"]),
        ];

        let homes = assemble_homes(vec![row(1), row(2)], usage, providers);

        assert_eq!(homes.len(), 2);
        assert_eq!(homes[0].id, 1);
        assert!(homes[0].home_usage_data.is_none());
        assert_eq!(homes[0].utility_providers.as_ref().map(Vec::len), Some(1));

        let second = &homes[1];
        assert_eq!(second.home_usage_data.as_ref().map(|u| u.id), Some(10));
        let ids: Vec<i32> = second
            .utility_providers
            .iter()
            .flatten()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, [20, 22]);
    }

    #[test]
    fn home_without_provider_rows_reports_absent_list() {
        let homes = assemble_homes(vec![row(1)], vec![], vec![]);

        assert_eq!(homes[0].utility_providers, None);
        assert_eq!(homes[0].home_usage_data, None);
    }

    #[test]
    fn orphan_children_are_dropped() {
        let homes = assemble_homes(vec![row(1)], vec![], vec![provider(5, 99, &["Gas"])]);

        assert_eq!(homes[0].utility_providers, None);
    }

    #[test]
    fn not_found_message_names_entity() {
        assert_eq!(
            RepositoryError::utility_provider_not_found(3).to_string(),
            "utility provider 3 not found"
        );
    }
}
