use std::collections::BTreeMap;

use home_energy_client::{
    db::{assemble_homes, HomeRow, RepositoryError},
    domain::{Home, HomeUsageData, NewHome, NewHomeUsageData, NewUtilityProvider, UtilityProvider},
};
use tokio::sync::RwLock;

use super::HomeStore;

#[derive(Default)]
struct Tables {
    next_home_id: i32,
    next_usage_id: i32,
    next_provider_id: i32,
    homes: BTreeMap<i32, HomeRow>,
    // keyed by home id
    usage: BTreeMap<i32, HomeUsageData>,
    providers: BTreeMap<i32, UtilityProvider>,
}

impl Tables {
    fn alloc(counter: &mut i32) -> i32 {
        *counter += 1;
        *counter
    }

    fn assemble(&self, homes: Vec<HomeRow>) -> Vec<Home> {
        let usage = homes
            .iter()
            .filter_map(|h| self.usage.get(&h.id).cloned())
            .collect();
        let providers = self
            .providers
            .values()
            .filter(|p| self.homes.contains_key(&p.home_id))
            .cloned()
            .collect();
        assemble_homes(homes, usage, providers)
    }

    fn require_home(&self, id: i32) -> Result<(), RepositoryError> {
        if self.homes.contains_key(&id) {
            Ok(())
        } else {
            Err(RepositoryError::home_not_found(id))
        }
    }
}

/// Process-local store with the same semantics as the Postgres one, for tests
/// and local development.
///
/// Each write holds the table lock for its whole duration, so an aggregate
/// becomes visible to readers in one step. Writes to different homes therefore
/// queue behind each other; `PgHomeStore` has no such lock.
#[derive(Default)]
pub struct InMemoryHomeStore {
    tables: RwLock<Tables>,
}

impl InMemoryHomeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl HomeStore for InMemoryHomeStore {
    async fn create_home(&self, home: NewHome) -> Result<Home, RepositoryError> {
        let mut t = self.tables.write().await;

        let home_id = Tables::alloc(&mut t.next_home_id);
        let row = HomeRow::from(&home.to_bare_home(home_id));

        let NewHome {
            home_usage_data,
            utility_providers,
            ..
        } = home;

        let usage = home_usage_data.map(|u| {
            let id = Tables::alloc(&mut t.next_usage_id);
            u.into_persisted(id, home_id)
        });

        let providers: Vec<UtilityProvider> = utility_providers
            .into_iter()
            .flatten()
            .map(|p| {
                let id = Tables::alloc(&mut t.next_provider_id);
                p.into_persisted(id, home_id)
            })
            .collect();

        t.homes.insert(home_id, row.clone());
        if let Some(u) = &usage {
            t.usage.insert(home_id, u.clone());
        }
        for p in &providers {
            t.providers.insert(p.id, p.clone());
        }

        Ok(row.into_home(usage, providers))
    }

    async fn list_homes(&self) -> Result<Vec<Home>, RepositoryError> {
        let t = self.tables.read().await;
        let rows = t.homes.values().cloned().collect();
        Ok(t.assemble(rows))
    }

    async fn get_home(&self, id: i32) -> Result<Home, RepositoryError> {
        let t = self.tables.read().await;
        let row = t
            .homes
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::home_not_found(id))?;

        t.assemble(vec![row])
            .pop()
            .ok_or_else(|| RepositoryError::home_not_found(id))
    }

    async fn delete_home(&self, id: i32) -> Result<(), RepositoryError> {
        let mut t = self.tables.write().await;
        t.homes
            .remove(&id)
            .ok_or_else(|| RepositoryError::home_not_found(id))?;

        t.usage.remove(&id);
        t.providers.retain(|_, p| p.home_id != id);
        Ok(())
    }

    async fn upsert_usage_data(
        &self,
        home_id: i32,
        usage: NewHomeUsageData,
    ) -> Result<HomeUsageData, RepositoryError> {
        let mut t = self.tables.write().await;
        t.require_home(home_id)?;

        let existing = t.usage.get(&home_id).map(|u| u.id);
        let id = match existing {
            Some(id) => id,
            None => Tables::alloc(&mut t.next_usage_id),
        };
        let persisted = usage.into_persisted(id, home_id);
        t.usage.insert(home_id, persisted.clone());
        Ok(persisted)
    }

    async fn add_utility_provider(
        &self,
        home_id: i32,
        provider: NewUtilityProvider,
    ) -> Result<UtilityProvider, RepositoryError> {
        let mut t = self.tables.write().await;
        t.require_home(home_id)?;

        let id = Tables::alloc(&mut t.next_provider_id);
        let persisted = provider.into_persisted(id, home_id);
        t.providers.insert(id, persisted.clone());
        Ok(persisted)
    }

    async fn update_utility_provider(
        &self,
        id: i32,
        provider: NewUtilityProvider,
    ) -> Result<UtilityProvider, RepositoryError> {
        let mut t = self.tables.write().await;
        let existing = t
            .providers
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::utility_provider_not_found(id))?;

        existing.provided_utilities = provider.provided_utilities;
        Ok(existing.clone())
    }

    async fn delete_utility_provider(&self, id: i32) -> Result<(), RepositoryError> {
        let mut t = self.tables.write().await;
        t.providers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::utility_provider_not_found(id))
    }
}
