use serde::{Deserialize, Serialize, Serializer};

/// Usage statistics for a single home (one-to-one with `Home`).
///
/// Equality is by identifier.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct HomeUsageData {
    #[serde(alias = "id")]
    pub id: i32,
    /// kWh per month; any JSON number is accepted.
    #[serde(default, serialize_with = "whole_or_fractional")]
    pub monthly_electric_usage: Option<f64>,
    #[serde(default)]
    pub has_solar: bool,
    pub home_id: i32,
}

/// Usage data as submitted by a client, before the store assigns identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewHomeUsageData {
    #[serde(default, serialize_with = "whole_or_fractional")]
    pub monthly_electric_usage: Option<f64>,
    #[serde(default)]
    pub has_solar: bool,
}

impl NewHomeUsageData {
    pub fn new(monthly_electric_usage: Option<f64>, has_solar: bool) -> Self {
        Self {
            monthly_electric_usage,
            has_solar,
        }
    }

    pub fn into_persisted(self, id: i32, home_id: i32) -> HomeUsageData {
        HomeUsageData {
            id,
            monthly_electric_usage: self.monthly_electric_usage,
            has_solar: self.has_solar,
            home_id,
        }
    }
}

impl PartialEq for HomeUsageData {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

// Integral values within f64's exact range go out as JSON integers, so a
// submitted `123` reads back as `123` rather than `123.0`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn whole_or_fractional<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match *value {
        Some(v) if v.fract() == 0.0 && v.abs() <= MAX_EXACT_INTEGER => {
            serializer.serialize_some(&(v as i64))
        }
        Some(v) => serializer.serialize_some(&v),
        None => serializer.serialize_none(),
    }
}
