//! Application configuration.
//!
//! A JSON file whose every field is defaulted, so `{}` is a valid config.
//! CLI flags and `DEVCAMP_*` environment variables override it (see
//! [`crate::cli`]).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geocoder::{GeocoderConfig, GeocoderProvider};
use crate::http_server::HttpServerConfig;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (default: "info")
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Full application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub geocoder: GeocoderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.http.api_prefix;
        if !prefix.is_empty() && !prefix.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "http.api_prefix must start with '/': '{}'",
                prefix
            )));
        }
        if prefix.contains('{') || prefix.contains('}') {
            return Err(ConfigError::Invalid(format!(
                "http.api_prefix can not contain path parameters: '{}'",
                prefix
            )));
        }

        if self.http.host.trim().is_empty() {
            return Err(ConfigError::Invalid("http.host must not be empty".to_string()));
        }

        if self.geocoder.timeout_secs == 0 {
            return Err(ConfigError::Invalid("geocoder.timeout_secs must be > 0".to_string()));
        }

        if self.geocoder.provider == GeocoderProvider::Mapquest
            && self.geocoder.api_key.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::Invalid(
                "geocoder.api_key is required for the mapquest provider".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_object_is_default() {
        let file = write_config("{}");
        let config = AppConfig::load(file.path()).unwrap();

        assert_eq!(config.http, HttpServerConfig::default());
        assert_eq!(config.geocoder.provider, GeocoderProvider::Static);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_full_config() {
        let file = write_config(
            r#"{
                "http": {"host": "127.0.0.1", "port": 8080, "api_prefix": "/api/v2"},
                "geocoder": {"provider": "mapquest", "api_key": "k", "timeout_secs": 3},
                "logging": {"level": "debug", "format": "json"}
            }"#,
        );
        let config = AppConfig::load(file.path()).unwrap();

        assert_eq!(config.http.socket_addr(), "127.0.0.1:8080");
        assert_eq!(config.http.api_prefix, "/api/v2");
        assert_eq!(config.geocoder.provider, GeocoderProvider::Mapquest);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_mapquest_without_key_rejected() {
        let file = write_config(r#"{"geocoder": {"provider": "mapquest"}}"#);
        assert!(matches!(AppConfig::load(file.path()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_prefix_rejected() {
        let file = write_config(r#"{"http": {"api_prefix": "api"}}"#);
        assert!(matches!(AppConfig::load(file.path()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unreadable_and_malformed() {
        assert!(matches!(
            AppConfig::load(Path::new("/nonexistent/devcamp.json")),
            Err(ConfigError::Read { .. })
        ));

        let file = write_config("{not json");
        assert!(matches!(AppConfig::load(file.path()), Err(ConfigError::Parse(_))));
    }
}
