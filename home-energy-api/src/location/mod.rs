//! Postal code to place/region resolution.

pub mod zippopotam;

use home_energy_client::domain::ResolvedLocation;
use thiserror::Error;

pub use zippopotam::ZippopotamResolver;

#[derive(Debug, Error)]
pub enum LocationError {
    /// Upstream answered, but knows no place for this code. Not worth retrying.
    #[error("no location found for postal code {0}")]
    NotFound(String),

    /// Upstream could not be reached or failed server-side.
    #[error("location service unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected response from location service: {0}")]
    UnexpectedResponse(String),

    #[error("invalid location service configuration: {0}")]
    InvalidConfig(String),
}

impl LocationError {
    /// Whether a caller may reasonably retry the same request later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Unavailable(_) => "unavailable",
            Self::UnexpectedResponse(_) | Self::InvalidConfig(_) => "bad_response",
        }
    }
}

/// Resolves a postal code through an external lookup service.
///
/// One outbound request per call. No retries and no caching.
#[async_trait::async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self, postal_code: &str) -> Result<ResolvedLocation, LocationError>;
}
