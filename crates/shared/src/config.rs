//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Billing database configuration.
    pub billing: BillingConfig,
    /// Listings document store configuration.
    pub listings: ListingsConfig,
}

/// Billing database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// PostgreSQL connection URL.
    pub url: String,
}

/// Listings document store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingsConfig {
    /// MongoDB connection URI.
    pub uri: String,
    /// Database holding the listings collection.
    #[serde(default = "default_database")]
    pub database: String,
    /// Collection of listing documents.
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_database() -> String {
    "sample_airbnb".to_string()
}

fn default_collection() -> String {
    "listingsAndReviews".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(raw: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .expect("config should build")
            .try_deserialize()
            .expect("config should deserialize")
    }

    #[test]
    fn test_listings_defaults() {
        let cfg = from_toml(
            "[billing]\nurl = \"postgres://localhost/billing\"\n\
             [listings]\nuri = \"mongodb://localhost:27017\"\n",
        );

        assert_eq!(cfg.billing.url, "postgres://localhost/billing");
        assert_eq!(cfg.listings.database, "sample_airbnb");
        assert_eq!(cfg.listings.collection, "listingsAndReviews");
    }

    #[test]
    fn test_listings_overrides() {
        let cfg = from_toml(
            "[billing]\nurl = \"postgres://localhost/billing\"\n\
             [listings]\nuri = \"mongodb://localhost:27017\"\n\
             database = \"airbnb\"\ncollection = \"listings\"\n",
        );

        assert_eq!(cfg.listings.database, "airbnb");
        assert_eq!(cfg.listings.collection, "listings");
    }

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                ("TALLY__BILLING__URL", Some("postgres://env/billing")),
                ("TALLY__LISTINGS__URI", Some("mongodb://env:27017")),
                ("TALLY__LISTINGS__DATABASE", Some("env_db")),
            ],
            || {
                let cfg = AppConfig::load().expect("config should load from env");
                assert_eq!(cfg.billing.url, "postgres://env/billing");
                assert_eq!(cfg.listings.uri, "mongodb://env:27017");
                assert_eq!(cfg.listings.database, "env_db");
            },
        );
    }
}
