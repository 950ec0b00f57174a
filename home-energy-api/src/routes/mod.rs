//! HTTP surface.
//!
//! Public reads live under `/Homes`; writes and the postal-code lookup live
//! under `/admin`.

pub mod homes;
pub mod location;

use std::sync::Arc;

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;

use crate::{error::ApiError, location::LocationResolver, store::HomeStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HomeStore>,
    pub resolver: Arc<dyn LocationResolver>,
}

impl AppState {
    pub fn new(store: Arc<dyn HomeStore>, resolver: Arc<dyn LocationResolver>) -> Self {
        Self { store, resolver }
    }
}

/// JSON body extractor/responder whose rejections render as `ApiError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Path parameter extractor; a segment that fails to parse renders as
/// `ApiError` too.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

impl<T: Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/Homes", get(homes::list_homes))
        .route("/Homes/:id", get(homes::get_home))
        .route("/admin/Homes", post(homes::create_home))
        .route("/admin/Homes/:id", delete(homes::delete_home))
        .route("/admin/Homes/:id/HomeUsageData", put(homes::upsert_usage_data))
        .route(
            "/admin/Homes/:id/UtilityProviders",
            post(homes::add_utility_provider),
        )
        .route(
            "/admin/UtilityProviders/:id",
            put(homes::update_utility_provider).delete(homes::delete_utility_provider),
        )
        .route("/admin/Homes/Location/:zip", post(location::resolve_location))
        .with_state(state)
}
