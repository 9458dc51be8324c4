//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::campus::{default_campuses, CampusDirectory, DEFAULT_CAMPUS};
use crate::fetch::FetcherConfig;
use crate::models::{Campus, Language};

/// Environment variable overriding `weather.api_key`.
pub const WEATHER_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Environment variable overriding `transit.api_key`.
pub const TRANSIT_API_KEY_ENV: &str = "DIGITRANSIT_API_KEY";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Outbound HTTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Largest accepted response body, bytes
    #[serde(default = "default_max_content_size")]
    pub max_content_size: usize,
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("campus-briefing/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_content_size() -> usize {
    5 * 1024 * 1024
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            max_content_size: default_max_content_size(),
        }
    }
}

impl HttpConfig {
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            max_content_size: self.max_content_size,
            timeout: Duration::from_secs(self.timeout_seconds),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Weather provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_url")]
    pub base_url: String,

    /// OpenWeather API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_weather_url() -> String {
    crate::weather::DEFAULT_ONECALL_URL.to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
            api_key: None,
        }
    }
}

/// Transit provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitConfig {
    #[serde(default = "default_transit_url")]
    pub endpoint: String,

    /// Search radius around the campus, meters
    #[serde(default = "default_radius")]
    pub radius_meters: u32,

    /// Maximum number of stops returned
    #[serde(default = "default_max_stops")]
    pub max_stops: u32,

    /// Digitransit subscription key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_transit_url() -> String {
    crate::transit::DEFAULT_GRAPHQL_URL.to_string()
}

fn default_radius() -> u32 {
    700
}

fn default_max_stops() -> u32 {
    5
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            endpoint: default_transit_url(),
            radius_meters: default_radius(),
            max_stops: default_max_stops(),
            api_key: None,
        }
    }
}

/// Menu provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    #[serde(default = "default_weekly_url")]
    pub weekly_base_url: String,

    #[serde(default = "default_course_url")]
    pub course_base_url: String,

    /// Weekly menu document replacing the bundled one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_path: Option<PathBuf>,
}

fn default_weekly_url() -> String {
    crate::menu::weekly::DEFAULT_BASE_URL.to_string()
}

fn default_course_url() -> String {
    crate::menu::courses::DEFAULT_BASE_URL.to_string()
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            weekly_base_url: default_weekly_url(),
            course_base_url: default_course_url(),
            static_path: None,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Language used when a request does not name one
    #[serde(default)]
    pub language: Language,

    /// Campus used when a request does not name one
    #[serde(default = "default_campus")]
    pub campus: String,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub transit: TransitConfig,

    #[serde(default)]
    pub menus: MenuConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default = "default_campuses")]
    pub campuses: Vec<Campus>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_campus() -> String {
    DEFAULT_CAMPUS.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            language: Language::default(),
            campus: default_campus(),
            http: HttpConfig::default(),
            weather: WeatherConfig::default(),
            transit: TransitConfig::default(),
            menus: MenuConfig::default(),
            server: ServerConfig::default(),
            campuses: default_campuses(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise use defaults; then apply
    /// API keys from the environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            info!("Loading config from {}", path.display());
            Self::from_file(path)?
        } else {
            debug!("No config at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Replace API keys with values from `lookup` (the environment in `load`).
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(WEATHER_API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.weather.api_key = Some(key);
        }
        if let Some(key) = lookup(TRANSIT_API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.transit.api_key = Some(key);
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "HTTP timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.transit.radius_meters == 0 || self.transit.max_stops == 0 {
            return Err(ConfigError::ValidationError(
                "Transit radius and max stops must be greater than 0".to_string(),
            ));
        }

        if !self.campuses.iter().any(|c| c.matches(&self.campus)) {
            return Err(ConfigError::ValidationError(format!(
                "Default campus '{}' is not in the campus list",
                self.campus
            )));
        }

        Ok(())
    }

    /// Campus directory with the configured default.
    pub fn campus_directory(&self) -> CampusDirectory {
        CampusDirectory::new(self.campuses.clone(), self.campus.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.language, Language::Fi);
        assert_eq!(config.campus, "Karamalmi");
        assert_eq!(config.transit.radius_meters, 700);
        assert_eq!(config.transit.max_stops, 5);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.campuses.len(), 4);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.http.timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_unknown_campus() {
        let mut config = AppConfig::default();
        config.campus = "Otaniemi".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_radius() {
        let mut config = AppConfig::default();
        config.transit.radius_meters = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.campus, parsed.campus);
        assert_eq!(config.campuses, parsed.campuses);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
language = "en"
campus = "myyrmäki"

[transit]
radius_meters = 400
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.language, Language::En);
        assert_eq!(config.transit.radius_meters, 400);
        assert_eq!(config.transit.max_stops, 5);
        assert_eq!(config.campus_directory().resolve(None).unwrap().name, "Myyrmäki");
    }

    #[test]
    fn test_custom_campus_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
campus = "Test"

[[campuses]]
name = "Test"
coords = {{ latitude = 60.0, longitude = 25.0 }}

[campuses.restaurant]
name = "test-restaurant"
display_name = "Test Restaurant"
id = 1
provider = "course_list"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.campuses.len(), 1);
        assert_eq!(config.campuses[0].restaurant.id, 1);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/campus-briefing.toml")).unwrap();
        assert_eq!(config.campus, "Karamalmi");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|name| match name {
            WEATHER_API_KEY_ENV => Some("weather-key".to_string()),
            TRANSIT_API_KEY_ENV => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.weather.api_key.as_deref(), Some("weather-key"));
        assert_eq!(config.transit.api_key, None);
    }

    #[test]
    fn test_fetcher_config_from_http() {
        let http = HttpConfig {
            timeout_seconds: 5,
            ..Default::default()
        };
        assert_eq!(http.fetcher_config().timeout, Duration::from_secs(5));
    }
}
