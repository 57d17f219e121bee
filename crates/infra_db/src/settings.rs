//! Environment-driven database settings
//!
//! Settings are read from `BILLING_*` environment variables, with a `.env`
//! file loaded first when present.

use serde::Deserialize;

use crate::pool::DatabaseConfig;

/// Database settings loaded from the environment
///
/// Recognized variables: `BILLING_DATABASE_URL`, `BILLING_MAX_CONNECTIONS`,
/// `BILLING_MIN_CONNECTIONS`.
#[derive(Debug, Clone, Deserialize)]
pub struct DbSettings {
    /// PostgreSQL connection string
    pub database_url: String,
    /// Maximum number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of pooled connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/billing".to_string(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

impl DbSettings {
    /// Loads settings from the environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        config::Config::builder()
            .add_source(config::Environment::with_prefix("BILLING"))
            .build()?
            .try_deserialize()
    }

    /// Converts the settings into a pool configuration
    pub fn pool_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
    }
}
