use anyhow::Result;
use config::{Config, Environment, File};
use moka::future::Cache;
use sea_orm::Database;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::schemas::AppState;

/// Runtime settings.
///
/// Resolved from built-in defaults, then an optional `bazaar.yaml` /
/// `bazaar.toml` in the working directory, then `BAZAAR_*` environment
/// variables. Command line flags override the result.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    /// How long the active catalog snapshot may be served from memory
    pub catalog_cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    /// Default `EnvFilter` directive when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://bazaar.db?mode=rwc".to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
            catalog_cache_ttl_secs: 60,
            request_timeout_secs: 30,
            log_filter: "bazaar=debug,workflow=debug,tower_http=debug,axum::rejection=trace"
                .to_string(),
        }
    }
}

impl Settings {
    /// Load settings from file and environment on top of the defaults.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Settings::default();

        let settings = Config::builder()
            .set_default("database_url", defaults.database_url)?
            .set_default("bind_address", defaults.bind_address)?
            .set_default("catalog_cache_ttl_secs", defaults.catalog_cache_ttl_secs)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("log_filter", defaults.log_filter)?
            .add_source(File::with_name("bazaar").required(false))
            .add_source(Environment::with_prefix("BAZAAR"))
            .build()?
            .try_deserialize::<Settings>()?;

        Ok(settings)
    }

    /// Apply command line overrides.
    pub fn with_overrides(mut self, database_url: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        if let Some(address) = bind_address {
            self.bind_address = address;
        }
        self
    }
}

/// Connect to the database and build the shared application state
pub async fn initialize_app_state_with_settings(settings: &Settings) -> Result<AppState> {
    info!("Connecting to database: {}", settings.database_url);
    let db = Database::connect(&settings.database_url).await?;

    let cache = Cache::builder()
        .max_capacity(100)
        .time_to_live(Duration::from_secs(settings.catalog_cache_ttl_secs))
        .build();

    Ok(AppState::new(
        db,
        cache,
        Duration::from_secs(settings.request_timeout_secs),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_only_given_values() {
        let settings = Settings::default().with_overrides(Some("sqlite::memory:".to_string()), None);
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.bind_address, "0.0.0.0:3000");
        assert_eq!(settings.request_timeout_secs, 30);
    }
}
