use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub kind: StoreKind,
    /// Falls back to `DATABASE_URL` when unset.
    pub uri: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub apply_schema: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::default(),
            uri: None,
            max_connections: default_max_connections(),
            apply_schema: false,
        }
    }
}

impl StoreConfig {
    pub fn database_url(&self) -> anyhow::Result<String> {
        match &self.uri {
            Some(uri) => Ok(uri.clone()),
            None => std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("store.uri is not set and DATABASE_URL is missing")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_location_base_url")]
    pub base_url: String,
    #[serde(default = "default_location_country")]
    pub country: String,
    #[serde(default = "default_location_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            base_url: default_location_base_url(),
            country: default_location_country(),
            timeout_ms: default_location_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub location: LocationConfig,
    pub metrics: Option<MetricsConfig>,
}

fn default_max_connections() -> u32 {
    5
}

fn default_location_base_url() -> String {
    "https://api.zippopotam.us".to_string()
}

fn default_location_country() -> String {
    "us".to_string()
}

fn default_location_timeout_ms() -> u64 {
    10_000
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("HOME_ENERGY_CONFIG")
            .unwrap_or_else(|_| "home-energy-config.toml".to_string());
        let contents = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read config {path}: {e}"))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [server]
            bind_addr = "127.0.0.1:8080"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.store.kind, StoreKind::Postgres);
        assert_eq!(cfg.store.max_connections, 5);
        assert!(!cfg.store.apply_schema);
        assert_eq!(cfg.location.base_url, "https://api.zippopotam.us");
        assert_eq!(cfg.location.country, "us");
        assert_eq!(cfg.location.timeout_ms, 10_000);
        assert!(cfg.metrics.is_none());
    }

    #[test]
    fn full_config_parses() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [server]
            bind_addr = "0.0.0.0:8080"

            [store]
            kind = "memory"
            uri = "postgres://localhost/homes"
            max_connections = 12
            apply_schema = true

            [location]
            base_url = "http://localhost:9999"
            country = "ca"
            timeout_ms = 250

            [metrics]
            bind_addr = "0.0.0.0:9000"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.store.kind, StoreKind::Memory);
        assert_eq!(cfg.store.database_url().unwrap(), "postgres://localhost/homes");
        assert_eq!(cfg.store.max_connections, 12);
        assert_eq!(cfg.location.country, "ca");
        assert_eq!(cfg.location.timeout_ms, 250);
        assert_eq!(cfg.metrics.unwrap().bind_addr, "0.0.0.0:9000");
    }

    #[test]
    fn unknown_store_kind_is_rejected() {
        let res = AppConfig::from_toml_str(
            r#"
            [server]
            bind_addr = "0.0.0.0:8080"

            [store]
            kind = "sqlite"
            "#,
        );

        assert!(res.is_err());
    }
}
