use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::models::ResultLimits;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub geocoding: GeocodingSettings,
    #[serde(default)]
    pub map_data: MapDataSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingSettings {
    #[serde(default = "default_geocoding_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_secs: u64,
}

impl GeocodingSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            endpoint: default_geocoding_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoding_timeout(),
        }
    }
}

fn default_geocoding_endpoint() -> String { "https://nominatim.openstreetmap.org".to_string() }
fn default_user_agent() -> String { "accommodation-advisor-app".to_string() }
fn default_geocoding_timeout() -> u64 { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct MapDataSettings {
    #[serde(default = "default_map_data_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_map_data_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_tourism_categories")]
    pub tourism_categories: Vec<String>,
}

impl MapDataSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for MapDataSettings {
    fn default() -> Self {
        Self {
            endpoint: default_map_data_endpoint(),
            timeout_secs: default_map_data_timeout(),
            tourism_categories: default_tourism_categories(),
        }
    }
}

fn default_map_data_endpoint() -> String { "https://overpass-api.de/api/interpreter".to_string() }
fn default_map_data_timeout() -> u64 { 10 }
fn default_tourism_categories() -> Vec<String> {
    ["hotel", "hostel", "motel", "guest_house", "chalet", "resort", "apartment"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_rental_result_limit")]
    pub rental_result_limit: Option<usize>,
    #[serde(default)]
    pub hotel_result_limit: Option<usize>,
    #[serde(default = "default_listing_url_base")]
    pub listing_url_base: String,
}

impl SearchSettings {
    pub fn result_limits(&self) -> ResultLimits {
        ResultLimits {
            rentals: self.rental_result_limit,
            hotels: self.hotel_result_limit,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            rental_result_limit: default_rental_result_limit(),
            hotel_result_limit: None,
            listing_url_base: default_listing_url_base(),
        }
    }
}

fn default_rental_result_limit() -> Option<usize> { Some(10) }
fn default_listing_url_base() -> String { "https://www.airbnb.com/rooms/".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ADVISOR__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ADVISOR__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("ADVISOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_database_url_override(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ADVISOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Let DATABASE_URL or DB_CONNECTION_STRING replace `database.url`
fn apply_database_url_override(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let database_url = env::var("DATABASE_URL")
        .or_else(|_| env::var("DB_CONNECTION_STRING"))
        .ok();

    let Some(url) = database_url else {
        return Ok(settings);
    };

    Config::builder()
        .add_source(settings)
        .set_override("database.url", url)?
        .build()
}
