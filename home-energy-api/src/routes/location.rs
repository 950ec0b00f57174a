use axum::extract::State;
use home_energy_client::domain::ResolvedLocation;

use super::{AppJson, AppPath, AppState};
use crate::error::ApiError;

/// `POST /admin/Homes/Location/{zip}`. The code is passed upstream as-is.
pub async fn resolve_location(
    State(state): State<AppState>,
    AppPath(postal_code): AppPath<String>,
) -> Result<AppJson<ResolvedLocation>, ApiError> {
    match state.resolver.resolve(&postal_code).await {
        Ok(location) => {
            metrics::counter!("location_lookups_total", "outcome" => "found").increment(1);
            tracing::info!(%postal_code, place = %location.place_name, "postal code resolved");
            Ok(AppJson(location))
        }
        Err(e) => {
            metrics::counter!("location_lookups_total", "outcome" => e.outcome()).increment(1);
            tracing::warn!(%postal_code, error = %e, transient = e.is_transient(), "postal code lookup failed");
            Err(e.into())
        }
    }
}
