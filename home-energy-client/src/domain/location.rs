use serde::{Deserialize, Serialize};

/// Place and region for a postal code, as reported by the lookup service.
///
/// Values are carried verbatim from upstream. Only `place name` and `state`
/// are guaranteed; the remaining fields appear when upstream supplied them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    #[serde(rename = "place name")]
    pub place_name: String,
    pub state: String,
    #[serde(rename = "state abbreviation", default, skip_serializing_if = "Option::is_none")]
    pub state_abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(rename = "post code", default, skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_uses_upstream_key_names() {
        let location = ResolvedLocation {
            place_name: "Des Moines".to_string(),
            state: "Iowa".to_string(),
            state_abbreviation: Some("IA".to_string()),
            latitude: None,
            longitude: None,
            post_code: Some("50313".to_string()),
            country: None,
        };

        let json = serde_json::to_string(&location).unwrap();
        assert!(json.contains(r#""place name":"Des Moines""#));
        assert!(json.contains(r#""state":"Iowa""#));
        assert!(json.contains(r#""state abbreviation":"IA""#));
        assert!(!json.contains("latitude"));
    }
}
