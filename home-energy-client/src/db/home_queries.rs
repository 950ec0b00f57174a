use sqlx::{PgPool, Postgres, Transaction};

use super::{assemble_homes, HomeRow, RepositoryError};
use crate::domain::{
    Home, HomeUsageData, NewHome, NewHomeUsageData, NewUtilityProvider, UtilityProvider,
};

const SELECT_HOMES: &str = r#"
    SELECT id, owner_last_name, street_address, city
    FROM homes
"#;

const SELECT_USAGE: &str = r#"
    SELECT id, monthly_electric_usage, has_solar, home_id
    FROM home_usage_data
    WHERE home_id = ANY($1)
"#;

const SELECT_PROVIDERS: &str = r#"
    SELECT id, provided_utilities, home_id
    FROM utility_providers
    WHERE home_id = ANY($1)
    ORDER BY id
"#;

/// Insert a home and any submitted children in one transaction.
///
/// Any failure drops the transaction, which rolls it back, so no partial
/// aggregate is ever committed.
pub async fn insert_home_aggregate(pool: &PgPool, home: &NewHome) -> Result<Home, RepositoryError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, HomeRow>(
        r#"
        INSERT INTO homes (owner_last_name, street_address, city)
        VALUES ($1, $2, $3)
        RETURNING id, owner_last_name, street_address, city
        "#,
    )
    .bind(&home.owner_last_name)
    .bind(&home.street_address)
    .bind(&home.city)
    .fetch_one(&mut *tx)
    .await?;

    let usage = match &home.home_usage_data {
        Some(u) => Some(insert_usage(&mut tx, row.id, u).await?),
        None => None,
    };

    let mut providers = Vec::new();
    for p in home.utility_providers.iter().flatten() {
        providers.push(insert_provider(&mut tx, row.id, p).await?);
    }

    tx.commit().await?;

    tracing::debug!(
        home_id = row.id,
        has_usage = usage.is_some(),
        providers = providers.len(),
        "home aggregate committed"
    );

    Ok(row.into_home(usage, providers))
}

async fn insert_usage(
    tx: &mut Transaction<'_, Postgres>,
    home_id: i32,
    usage: &NewHomeUsageData,
) -> Result<HomeUsageData, sqlx::Error> {
    sqlx::query_as::<_, HomeUsageData>(
        r#"
        INSERT INTO home_usage_data (home_id, monthly_electric_usage, has_solar)
        VALUES ($1, $2, $3)
        RETURNING id, monthly_electric_usage, has_solar, home_id
        "#,
    )
    .bind(home_id)
    .bind(usage.monthly_electric_usage)
    .bind(usage.has_solar)
    .fetch_one(&mut **tx)
    .await
}

async fn insert_provider(
    tx: &mut Transaction<'_, Postgres>,
    home_id: i32,
    provider: &NewUtilityProvider,
) -> Result<UtilityProvider, sqlx::Error> {
    sqlx::query_as::<_, UtilityProvider>(
        r#"
        INSERT INTO utility_providers (home_id, provided_utilities)
        VALUES ($1, $2)
        RETURNING id, provided_utilities, home_id
        "#,
    )
    .bind(home_id)
    .bind(provider.provided_utilities.as_slice())
    .fetch_one(&mut **tx)
    .await
}

/// All homes ordered by id, with children attached.
///
/// The three selects run in one repeatable-read transaction so every home is
/// paired with the children that existed at the same snapshot.
pub async fn list_homes(pool: &PgPool) -> Result<Vec<Home>, RepositoryError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
        .execute(&mut *tx)
        .await?;

    let homes = sqlx::query_as::<_, HomeRow>(&format!("{SELECT_HOMES} ORDER BY id"))
        .fetch_all(&mut *tx)
        .await?;

    let homes = load_children(&mut tx, homes).await?;
    tx.commit().await?;

    Ok(homes)
}

pub async fn get_home(pool: &PgPool, id: i32) -> Result<Home, RepositoryError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
        .execute(&mut *tx)
        .await?;

    let row = sqlx::query_as::<_, HomeRow>(&format!("{SELECT_HOMES} WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepositoryError::home_not_found(id))?;

    let mut homes = load_children(&mut tx, vec![row]).await?;
    tx.commit().await?;

    homes.pop().ok_or_else(|| RepositoryError::home_not_found(id))
}

async fn load_children(
    tx: &mut Transaction<'_, Postgres>,
    homes: Vec<HomeRow>,
) -> Result<Vec<Home>, RepositoryError> {
    if homes.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = homes.iter().map(|h| h.id).collect();

    let usage = sqlx::query_as::<_, HomeUsageData>(SELECT_USAGE)
        .bind(ids.as_slice())
        .fetch_all(&mut **tx)
        .await?;

    let providers = sqlx::query_as::<_, UtilityProvider>(SELECT_PROVIDERS)
        .bind(ids.as_slice())
        .fetch_all(&mut **tx)
        .await?;

    Ok(assemble_homes(homes, usage, providers))
}

/// Delete a home; usage data and providers go with it via `ON DELETE CASCADE`.
pub async fn delete_home(pool: &PgPool, id: i32) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM homes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::home_not_found(id));
    }
    Ok(())
}

/// Create the usage record of a home, or replace its values if one exists.
pub async fn upsert_usage_data(
    pool: &PgPool,
    home_id: i32,
    usage: &NewHomeUsageData,
) -> Result<HomeUsageData, RepositoryError> {
    sqlx::query_as::<_, HomeUsageData>(
        r#"
        INSERT INTO home_usage_data (home_id, monthly_electric_usage, has_solar)
        VALUES ($1, $2, $3)
        ON CONFLICT (home_id) DO UPDATE
            SET monthly_electric_usage = EXCLUDED.monthly_electric_usage,
                has_solar = EXCLUDED.has_solar
        RETURNING id, monthly_electric_usage, has_solar, home_id
        "#,
    )
    .bind(home_id)
    .bind(usage.monthly_electric_usage)
    .bind(usage.has_solar)
    .fetch_one(pool)
    .await
    .map_err(|e| missing_home(e, home_id))
}

pub async fn add_utility_provider(
    pool: &PgPool,
    home_id: i32,
    provider: &NewUtilityProvider,
) -> Result<UtilityProvider, RepositoryError> {
    sqlx::query_as::<_, UtilityProvider>(
        r#"
        INSERT INTO utility_providers (home_id, provided_utilities)
        VALUES ($1, $2)
        RETURNING id, provided_utilities, home_id
        "#,
    )
    .bind(home_id)
    .bind(provider.provided_utilities.as_slice())
    .fetch_one(pool)
    .await
    .map_err(|e| missing_home(e, home_id))
}

pub async fn update_utility_provider(
    pool: &PgPool,
    id: i32,
    provider: &NewUtilityProvider,
) -> Result<UtilityProvider, RepositoryError> {
    sqlx::query_as::<_, UtilityProvider>(
        r#"
        UPDATE utility_providers
        SET provided_utilities = $2
        WHERE id = $1
        RETURNING id, provided_utilities, home_id
        "#,
    )
    .bind(id)
    .bind(provider.provided_utilities.as_slice())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| RepositoryError::utility_provider_not_found(id))
}

pub async fn delete_utility_provider(pool: &PgPool, id: i32) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM utility_providers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::utility_provider_not_found(id));
    }
    Ok(())
}

// A child insert against a missing home fails the `home_id` foreign key.
fn missing_home(err: sqlx::Error, home_id: i32) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            RepositoryError::home_not_found(home_id)
        }
        _ => RepositoryError::Database(err),
    }
}
