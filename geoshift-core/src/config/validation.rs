//! Configuration validation module

use crate::config::{ApiConfig, Config, HttpConfig, LoggingConfig};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("API configuration error: {message}")]
    Api { message: String },

    #[error("HTTP configuration error: {message}")]
    Http { message: String },

    #[error("Logging configuration error: {message}")]
    Logging { message: String },
}

impl ValidationError {
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}

fn validate_base_url(name: &str, value: &str) -> Result<(), ValidationError> {
    let parsed = url::Url::parse(value).map_err(|e| {
        ValidationError::api(format!("{} is not a valid URL ({}): {}", name, value, e))
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ValidationError::api(format!(
            "{} must use http or https, got {}",
            name,
            parsed.scheme()
        )));
    }

    Ok(())
}

impl Validate for ApiConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_base_url("api_url", &self.api_url)?;
        validate_base_url("ml_api_url", &self.ml_api_url)?;
        validate_base_url("geospatial_url", &self.geospatial_url)?;
        Ok(())
    }
}

impl Validate for HttpConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.user_agent.trim().is_empty() {
            return Err(ValidationError::http("User agent cannot be empty"));
        }

        if self.request_timeout_seconds == Some(0) {
            return Err(ValidationError::http(
                "Request timeout must be greater than 0 when set",
            ));
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.level.trim().is_empty() {
            return Err(ValidationError::logging("Log level cannot be empty"));
        }

        match self.format.as_str() {
            "pretty" | "compact" | "json" => Ok(()),
            other => Err(ValidationError::logging(format!(
                "Log format must be one of pretty, compact, json; got {}",
                other
            ))),
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_unparseable_url() {
        let mut config = Config::default();
        config.api.ml_api_url = "not a url".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ml_api_url"));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut api = ApiConfig::default();
        api.geospatial_url = "ftp://example.com/geo".to_string();
        assert!(api.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let http = HttpConfig {
            request_timeout_seconds: Some(0),
            ..HttpConfig::default()
        };
        assert!(http.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let logging = LoggingConfig {
            level: "info".to_string(),
            format: "xml".to_string(),
        };
        let err = logging.validate().unwrap_err();
        assert!(err.to_string().contains("xml"));
    }
}
