use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use home_energy_client::domain::{
    Home, HomeUsageData, NewHome, NewHomeUsageData, NewUtilityProvider, UtilityProvider,
};

use super::{AppJson, AppPath, AppState};
use crate::error::ApiError;

pub async fn list_homes(State(state): State<AppState>) -> Result<AppJson<Vec<Home>>, ApiError> {
    let homes = state.store.list_homes().await?;
    Ok(AppJson(homes))
}

pub async fn get_home(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<AppJson<Home>, ApiError> {
    let home = state.store.get_home(id).await?;
    Ok(AppJson(home))
}

/// Body parsing happens in the extractor, so a malformed payload is rejected
/// before the store is touched.
pub async fn create_home(
    State(state): State<AppState>,
    AppJson(new_home): AppJson<NewHome>,
) -> Result<impl IntoResponse, ApiError> {
    let home = match state.store.create_home(new_home).await {
        Ok(home) => home,
        Err(e) => {
            metrics::counter!("home_create_failed_total").increment(1);
            return Err(e.into());
        }
    };

    metrics::counter!("homes_created_total").increment(1);
    tracing::info!(
        home_id = home.id,
        has_usage = home.home_usage_data.is_some(),
        providers = home.utility_providers.as_ref().map_or(0, Vec::len),
        "home created"
    );

    let location = format!("/Homes/{}", home.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], AppJson(home)))
}

pub async fn delete_home(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_home(id).await?;
    tracing::info!(home_id = id, "home deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upsert_usage_data(
    State(state): State<AppState>,
    AppPath(home_id): AppPath<i32>,
    AppJson(usage): AppJson<NewHomeUsageData>,
) -> Result<AppJson<HomeUsageData>, ApiError> {
    let usage = state.store.upsert_usage_data(home_id, usage).await?;
    Ok(AppJson(usage))
}

pub async fn add_utility_provider(
    State(state): State<AppState>,
    AppPath(home_id): AppPath<i32>,
    AppJson(provider): AppJson<NewUtilityProvider>,
) -> Result<(StatusCode, AppJson<UtilityProvider>), ApiError> {
    let provider = state.store.add_utility_provider(home_id, provider).await?;
    tracing::info!(home_id, provider_id = provider.id, "utility provider added");
    Ok((StatusCode::CREATED, AppJson(provider)))
}

pub async fn update_utility_provider(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(provider): AppJson<NewUtilityProvider>,
) -> Result<AppJson<UtilityProvider>, ApiError> {
    let provider = state.store.update_utility_provider(id, provider).await?;
    Ok(AppJson(provider))
}

pub async fn delete_utility_provider(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_utility_provider(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
