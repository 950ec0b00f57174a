use serde::{Deserialize, Serialize};

use super::{HomeUsageData, NewHomeUsageData, NewUtilityProvider, UtilityProvider};

/// A persisted home together with its children.
///
/// `home_usage_data` and `utility_providers` are `None` when the home has no
/// such rows; they serialize as `null`. Equality is by identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Home {
    #[serde(alias = "id")]
    pub id: i32,
    pub owner_last_name: String,
    pub street_address: String,
    pub city: String,
    #[serde(default)]
    pub home_usage_data: Option<HomeUsageData>,
    #[serde(default)]
    pub utility_providers: Option<Vec<UtilityProvider>>,
}

impl PartialEq for Home {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// A home as submitted for creation.
///
/// The three address fields are required; a payload missing any of them is
/// rejected during deserialization. Identifiers sent by the client are
/// ignored. Absent children are skipped when serializing, so a request built
/// from this type carries only the children that were set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewHome {
    pub owner_last_name: String,
    pub street_address: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_usage_data: Option<NewHomeUsageData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utility_providers: Option<Vec<NewUtilityProvider>>,
}

impl NewHome {
    pub fn new(
        owner_last_name: impl Into<String>,
        street_address: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            owner_last_name: owner_last_name.into(),
            street_address: street_address.into(),
            city: city.into(),
            home_usage_data: None,
            utility_providers: None,
        }
    }

    pub fn with_usage(mut self, usage: NewHomeUsageData) -> Self {
        self.home_usage_data = Some(usage);
        self
    }

    /// Appends a provider, turning an absent provider list into a present one.
    pub fn with_utility_provider(mut self, provider: NewUtilityProvider) -> Self {
        self.utility_providers
            .get_or_insert_with(Vec::new)
            .push(provider);
        self
    }

    pub fn with_utility_providers(mut self, providers: Vec<NewUtilityProvider>) -> Self {
        self.utility_providers = Some(providers);
        self
    }

    /// Root fields of the persisted home, with no children attached.
    pub fn to_bare_home(&self, id: i32) -> Home {
        Home {
            id,
            owner_last_name: self.owner_last_name.clone(),
            street_address: self.street_address.clone(),
            city: self.city.clone(),
            home_usage_data: None,
            utility_providers: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_home() -> Home {
        Home {
            id: 1,
            owner_last_name: "Test1".to_string(),
            street_address: "123 Test St.".to_string(),
            city: "Test City".to_string(),
            home_usage_data: Some(NewHomeUsageData::new(Some(123.0), true).into_persisted(5, 1)),
            utility_providers: Some(vec![
                NewUtilityProvider::new(["Gas", "Electric"]).into_persisted(2, 1),
                NewUtilityProvider::new(["Water"]).into_persisted(3, 1),
            ]),
        }
    }

    #[test]
    fn home_without_children_serializes_explicit_nulls() {
        let home = NewHome::new("Test1", "123 Test St.", "Test City").to_bare_home(1);
        let json = serde_json::to_string(&home).unwrap();

        assert_eq!(
            json,
            r#"{"Id":1,"OwnerLastName":"Test1","StreetAddress":"123 Test St.","City":"Test City","HomeUsageData":null,"UtilityProviders":null}"#
        );
    }

    #[test]
    fn full_aggregate_survives_json_round_trip() {
        let home = sample_home();

        let json = serde_json::to_string(&home).unwrap();
        let back: Home = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, home.id);
        assert_eq!(back.owner_last_name, home.owner_last_name);
        assert_eq!(back.street_address, home.street_address);
        assert_eq!(back.city, home.city);

        let usage = back.home_usage_data.as_ref().unwrap();
        assert_eq!((usage.id, usage.home_id), (5, 1));
        assert_eq!(usage.monthly_electric_usage, Some(123.0));
        assert!(usage.has_solar);

        let providers = back.utility_providers.as_ref().unwrap();
        let summary: Vec<_> = providers
            .iter()
            .map(|p| (p.id, p.home_id, p.provided_utilities.clone()))
            .collect();
        assert_eq!(
            summary,
            [
                (2, 1, vec!["Gas".to_string(), "Electric".to_string()]),
                (3, 1, vec!["Water".to_string()]),
            ]
        );
        assert!(json.contains(r#""ProvidedUtilities":["Gas","Electric"]"#));
        assert!(!json.contains(r#""Home":"#));
    }

    #[test]
    fn builder_omits_absent_children() {
        let json = serde_json::to_string(&NewHome::new("Smith", "1 Main St.", "Ames")).unwrap();

        assert!(!json.contains("HomeUsageData"));
        assert!(!json.contains("UtilityProviders"));
    }

    #[test]
    fn builder_populates_children_in_order() {
        let home = NewHome::new("Smith", "1 Main St.", "Ames")
            .with_usage(NewHomeUsageData::new(Some(450.0), false))
            .with_utility_provider(NewUtilityProvider::new(["Gas"]))
            .with_utility_provider(NewUtilityProvider::new(["Electric"]));

        let json = serde_json::to_string(&home).unwrap();
        assert!(json.contains(r#""HomeUsageData":{"MonthlyElectricUsage":450,"HasSolar":false}"#));
        assert!(json.contains(
            r#""UtilityProviders":[{"ProvidedUtilities":["Gas"]},{"ProvidedUtilities":["Electric"]}]"#
        ));
    }

    #[test]
    fn empty_provider_list_is_distinct_from_absent() {
        let absent: NewHome = serde_json::from_str(
            r#"{"OwnerLastName":"A","StreetAddress":"B","City":"C"}"#,
        )
        .unwrap();
        let empty: NewHome = serde_json::from_str(
            r#"{"OwnerLastName":"A","StreetAddress":"B","City":"C","UtilityProviders":[]}"#,
        )
        .unwrap();
        let null: NewHome = serde_json::from_str(
            r#"{"OwnerLastName":"A","StreetAddress":"B","City":"C","HomeUsageData":null}"#,
        )
        .unwrap();

        assert_eq!(absent.utility_providers, None);
        assert_eq!(empty.utility_providers, Some(vec![]));
        assert_eq!(null.home_usage_data, None);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let res = serde_json::from_str::<NewHome>(r#"{"OwnerLastName":"A","StreetAddress":"B"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn client_supplied_ids_are_ignored() {
        let home: NewHome = serde_json::from_str(
            r#"{"Id":42,"OwnerLastName":"A","StreetAddress":"B","City":"C","HomeUsageData":{"Id":9,"HomeId":42,"MonthlyElectricUsage":1}}"#,
        )
        .unwrap();

        assert_eq!(home.home_usage_data, Some(NewHomeUsageData::new(Some(1.0), false)));
    }

    #[test]
    fn homes_compare_by_identifier() {
        let mut renamed = sample_home();
        renamed.owner_last_name = "Other".to_string();
        renamed.utility_providers = None;

        assert_eq!(renamed, sample_home());
        assert_ne!(NewHome::new("A", "B", "C").to_bare_home(2), sample_home());
    }
}
