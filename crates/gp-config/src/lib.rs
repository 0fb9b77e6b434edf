//! Store Catalog API Configuration
//!
//! TOML-based configuration with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub provider: ProviderConfig,
    pub defaults: DefaultsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    pub host: String,
    /// Path the catalog routes are mounted under, e.g. "/api"
    pub base_path: String,
    /// Scheme used in generated links when no X-Forwarded-Proto header is present
    pub public_scheme: String,
    /// Allowed CORS origins; "*" allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            base_path: "/api".to_string(),
            public_scheme: "http".to_string(),
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// Catalog provider (scraper bridge) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3100".to_string(),
            timeout_ms: 30_000,
            connect_timeout_ms: 5_000,
        }
    }
}

/// Defaults applied to per-app lookups of the developer aggregation routes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub lang: String,
    pub country: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            country: "us".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::ValidationError("http.port must be non-zero".into()));
        }
        if !self.http.base_path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "http.base_path must start with '/': {}",
                self.http.base_path
            )));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError("provider.base_url is required".into()));
        }
        Ok(())
    }

    /// Mount path without a trailing slash; empty when mounted at the root
    pub fn mount_path(&self) -> &str {
        self.http.base_path.trim_end_matches('/')
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# Store Catalog API Configuration
# Environment variables (GPLAY_*) override these settings

[http]
port = 3000
host = "0.0.0.0"
base_path = "/api"
public_scheme = "http"
cors_origins = ["*"]

[provider]
base_url = "http://localhost:3100"
timeout_ms = 30000
connect_timeout_ms = 5000

[defaults]
lang = "en"
country = "us"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_example_toml_parses_to_defaults() {
        let parsed: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();
        let defaults = AppConfig::default();

        assert_eq!(parsed.http.port, defaults.http.port);
        assert_eq!(parsed.http.base_path, defaults.http.base_path);
        assert_eq!(parsed.provider.base_url, defaults.provider.base_url);
        assert_eq!(parsed.defaults.lang, "en");
        assert_eq!(parsed.defaults.country, "us");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[provider]\nbase_url = \"http://scraper:9000\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.provider.base_url, "http://scraper:9000");
        assert_eq!(config.provider.timeout_ms, 30_000);
        assert_eq!(config.http.port, 3000);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http\nport = ").unwrap();

        assert!(matches!(AppConfig::from_file(file.path()), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validate() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.http.base_path = "api".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.provider.base_url = "  ".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.http.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mount_path() {
        let mut config = AppConfig::default();
        assert_eq!(config.mount_path(), "/api");

        config.http.base_path = "/".into();
        assert_eq!(config.mount_path(), "");

        config.http.base_path = "/store/v1/".into();
        assert_eq!(config.mount_path(), "/store/v1");
    }
}
