use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

// --- Constants for Default Configuration ---
// Development fallbacks only; never production-safe.
pub const DEFAULT_STORE_URI: &str = "bolt://localhost:7687";
pub const DEFAULT_STORE_USER: &str = "neo4j";
pub const DEFAULT_STORE_PASSWORD: &str = "password123";

/// Endpoint and credentials for the graph store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_STORE_URI.into(),
            user: DEFAULT_STORE_USER.into(),
            password: DEFAULT_STORE_PASSWORD.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Layered load: defaults, then an optional `config.toml`, then
    /// `LOREGRAPH_STORE__URI`-style environment overrides, then the legacy
    /// `NEO4J_*` variables the original deployment used.
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("store.uri", DEFAULT_STORE_URI)?
            .set_default("store.user", DEFAULT_STORE_USER)?
            .set_default("store.password", DEFAULT_STORE_PASSWORD)?
            // File: config.toml
            .add_source(File::with_name("config").required(false))
            // Environment: LOREGRAPH_STORE__URI=bolt://host:7687 -> store.uri
            .add_source(Environment::with_prefix("LOREGRAPH").separator("__"))
            // Legacy ENV overrides
            .set_override_option("store.uri", env::var("NEO4J_URI").ok())?
            .set_override_option("store.user", env::var("NEO4J_USER").ok())?
            .set_override_option("store.password", env::var("NEO4J_PASSWORD").ok())?
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_development_store() {
        let config = StoreConfig::default();
        assert_eq!(config.uri, "bolt://localhost:7687");
        assert_eq!(config.user, "neo4j");
        assert_eq!(config.password, "password123");
    }
}
