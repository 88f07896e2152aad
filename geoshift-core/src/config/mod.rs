//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable the web front end reads for the comparison API base URL
pub const API_URL_ENV_OVERRIDE: &str = "VITE_API_URL";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Backend base URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the basic comparison service (`/compare`)
    pub api_url: String,
    /// Base URL of the ML service (`/advanced-compare`, `/ml-models`, ...)
    pub ml_api_url: String,
    /// Base URL of the geospatial router (`/export-change-detections`, ...)
    pub geospatial_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            ml_api_url: "http://localhost:8000/api".to_string(),
            geospatial_url: "http://localhost:8080/ml_backend/geospatial".to_string(),
        }
    }
}

/// Shared HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Whole-request timeout. Unset means requests wait for the backend indefinitely.
    pub request_timeout_seconds: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("geoshift/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_seconds: None,
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// One of `pretty`, `compact` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_with(None)
    }

    /// Load configuration, layering an explicit file on top of the default sources
    pub fn load_with(explicit_file: Option<&str>) -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Add environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        builder = builder.add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = explicit_file {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        // Environment variables last (highest priority)
        builder = builder.add_source(config::Environment::with_prefix("GEOSHIFT").separator("__"));

        let mut config: Config = builder.build()?.try_deserialize()?;

        apply_api_url_override(
            &mut config.api,
            std::env::var(API_URL_ENV_OVERRIDE).ok().as_deref(),
        );

        config.validate()?;

        Ok(config)
    }
}

/// Blank values are ignored
fn apply_api_url_override(api: &mut ApiConfig, value: Option<&str>) {
    let Some(api_url) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    tracing::debug!(
        from = %api.api_url,
        to = %api_url,
        "{} overrides api.api_url",
        API_URL_ENV_OVERRIDE
    );
    api.api_url = api_url.to_string();
}

/// Error while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Failed to read configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
