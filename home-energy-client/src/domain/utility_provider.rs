use serde::{Deserialize, Deserializer, Serialize};

/// A utility provider serving a home (many-to-one with `Home`).
///
/// The link to the owning home is the `home_id` column only. There is no
/// field holding the parent, so a serialized provider can never embed its
/// home and the aggregate stays acyclic. Equality is by identifier.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct UtilityProvider {
    #[serde(alias = "id")]
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub provided_utilities: Vec<String>,
    pub home_id: i32,
}

impl PartialEq for UtilityProvider {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewUtilityProvider {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub provided_utilities: Vec<String>,
}

impl NewUtilityProvider {
    pub fn new<I, S>(provided_utilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            provided_utilities: provided_utilities.into_iter().map(Into::into).collect(),
        }
    }

    pub fn into_persisted(self, id: i32, home_id: i32) -> UtilityProvider {
        UtilityProvider {
            id,
            provided_utilities: self.provided_utilities,
            home_id,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
