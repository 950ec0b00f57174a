use std::time::Duration;

use home_energy_client::domain::ResolvedLocation;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use super::{LocationError, LocationResolver};
use crate::config::LocationConfig;

/// Client for the Zippopotam.us API (`GET {base}/{country}/{postal_code}`).
#[derive(Debug, Clone)]
pub struct ZippopotamResolver {
    client: Client,
    base_url: Url,
    country: String,
}

#[derive(Debug, Deserialize)]
struct ZipResponse {
    #[serde(rename = "post code")]
    post_code: Option<String>,
    country: Option<String>,
    #[serde(default)]
    places: Vec<ZipPlace>,
}

#[derive(Debug, Deserialize)]
struct ZipPlace {
    #[serde(rename = "place name")]
    place_name: String,
    state: String,
    #[serde(rename = "state abbreviation")]
    state_abbreviation: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
}

impl ZippopotamResolver {
    pub fn new(cfg: &LocationConfig) -> Result<Self, LocationError> {
        let base_url = Url::parse(&cfg.base_url)
            .map_err(|e| LocationError::InvalidConfig(format!("base_url '{}': {e}", cfg.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(LocationError::InvalidConfig(format!(
                "base_url '{}' cannot carry a path",
                cfg.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| LocationError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            country: cfg.country.clone(),
        })
    }

    fn lookup_url(&self, postal_code: &str) -> Result<Url, LocationError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LocationError::InvalidConfig("base_url cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(&self.country)
            .push(postal_code);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl LocationResolver for ZippopotamResolver {
    async fn resolve(&self, postal_code: &str) -> Result<ResolvedLocation, LocationError> {
        let url = self.lookup_url(postal_code)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LocationError::NotFound(postal_code.to_string()));
        }
        if status.is_server_error() {
            return Err(LocationError::Unavailable(format!("upstream returned {status}")));
        }
        if !status.is_success() {
            return Err(LocationError::UnexpectedResponse(format!("upstream returned {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;
        let parsed: ZipResponse = serde_json::from_slice(&body)
            .map_err(|e| LocationError::UnexpectedResponse(e.to_string()))?;

        into_location(parsed, postal_code)
    }
}

/// Map the first place of an upstream response, copying values verbatim.
fn into_location(resp: ZipResponse, postal_code: &str) -> Result<ResolvedLocation, LocationError> {
    let ZipResponse {
        post_code,
        country,
        places,
    } = resp;

    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| LocationError::NotFound(postal_code.to_string()))?;

    Ok(ResolvedLocation {
        place_name: place.place_name,
        state: place.state,
        state_abbreviation: place.state_abbreviation,
        latitude: place.latitude,
        longitude: place.longitude,
        post_code,
        country,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(base_url: &str) -> ZippopotamResolver {
        ZippopotamResolver::new(&LocationConfig {
            base_url: base_url.to_string(),
            ..LocationConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn maps_first_place() {
        let resp: ZipResponse = serde_json::from_str(
            r#"{
                "post code": "50313",
                "country": "United States",
                "country abbreviation": "US",
                "places": [
                    {"place name": "Des Moines", "longitude": "-93.6124", "state": "Iowa",
                     "state abbreviation": "IA", "latitude": "41.6381"},
                    {"place name": "Elsewhere", "state": "Nowhere"}
                ]
            }"#,
        )
        .unwrap();

        let location = into_location(resp, "50313").unwrap();
        assert_eq!(location.place_name, "Des Moines");
        assert_eq!(location.state, "Iowa");
        assert_eq!(location.state_abbreviation.as_deref(), Some("IA"));
        assert_eq!(location.post_code.as_deref(), Some("50313"));
    }

    #[test]
    fn keeps_upstream_values_verbatim() {
        let resp: ZipResponse = serde_json::from_str(
            r#"{"places": [{"place name": "  st. PAUL ", "state": "minnesota"}]}"#,
        )
        .unwrap();

        let location = into_location(resp, "55101").unwrap();
        assert_eq!(location.place_name, "  st. PAUL ");
        assert_eq!(location.state, "minnesota");
    }

    #[test]
    fn empty_places_is_not_found() {
        let resp: ZipResponse = serde_json::from_str(r#"{"places": []}"#).unwrap();

        let err = into_location(resp, "00000").unwrap_err();
        assert!(matches!(err, LocationError::NotFound(ref code) if code == "00000"));
        assert!(!err.is_transient());
    }

    #[test]
    fn lookup_url_escapes_postal_code_as_one_segment() {
        let r = resolver("http://localhost:8080/api/");

        let url = r.lookup_url("12 3/4").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/us/12%203%2F4");
    }

    #[test]
    fn lookup_url_without_base_path() {
        let r = resolver("https://api.zippopotam.us");

        let url = r.lookup_url("50313").unwrap();
        assert_eq!(url.as_str(), "https://api.zippopotam.us/us/50313");
    }

    #[test]
    fn rejects_unparsable_base_url() {
        let err = ZippopotamResolver::new(&LocationConfig {
            base_url: "not a url".to_string(),
            ..LocationConfig::default()
        })
        .unwrap_err();

        assert!(matches!(err, LocationError::InvalidConfig(_)));
    }
}
