//! Home aggregate entities and the JSON shape they take on the wire.
//!
//! Field names serialize in PascalCase (`OwnerLastName`, `HomeUsageData`,
//! `ProvidedUtilities`, ...). Optional children serialize as `null` when
//! absent, never as an empty object or list.

pub mod home;
pub mod home_usage_data;
pub mod location;
pub mod utility_provider;

pub use home::{Home, NewHome};
pub use home_usage_data::{HomeUsageData, NewHomeUsageData};
pub use location::ResolvedLocation;
pub use utility_provider::{NewUtilityProvider, UtilityProvider};
