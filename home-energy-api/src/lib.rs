pub mod config;
pub mod error;
pub mod location;
pub mod metrics_server;
pub mod observability;
pub mod routes;
pub mod store;

pub use routes::{router, AppState};
