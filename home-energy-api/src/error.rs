use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use home_energy_client::db::RepositoryError;
use serde_json::json;
use thiserror::Error;

use crate::location::LocationError;

/// Every failure a handler can surface, rendered as `{"error", "message"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid payload: {message}")]
    InvalidPayload { status: StatusCode, message: String },

    #[error("invalid path: {message}")]
    InvalidPath { status: StatusCode, message: String },

    #[error(transparent)]
    Store(#[from] RepositoryError),

    #[error(transparent)]
    Location(#[from] LocationError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidPayload {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidPath {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPayload { status, .. } | Self::InvalidPath { status, .. } => *status,
            Self::Store(RepositoryError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Store(RepositoryError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Location(LocationError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Location(LocationError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Location(LocationError::UnexpectedResponse(_) | LocationError::InvalidConfig(_)) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidPayload { .. } => "invalid_payload",
            Self::InvalidPath { .. } => "invalid_path",
            Self::Store(RepositoryError::NotFound { .. }) => "not_found",
            Self::Store(RepositoryError::Database(_)) => "internal_error",
            Self::Location(LocationError::NotFound(_)) => "location_not_found",
            Self::Location(LocationError::Unavailable(_)) => "location_unavailable",
            Self::Location(_) => "location_bad_gateway",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Store internals stay in the logs.
        let message = match &self {
            Self::Store(RepositoryError::Database(e)) => {
                tracing::error!(error = %e, "store operation failed");
                "internal server error".to_string()
            }
            other => {
                tracing::warn!(error = %other, status = status.as_u16(), "request failed");
                other.to_string()
            }
        };

        json_error(status, self.code(), message)
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
