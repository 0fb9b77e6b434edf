//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "gplay-api.toml",
    "./config/config.toml",
    "/etc/gplay-api/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match self.find_config_file() {
            Some(path) => {
                info!(?path, "Loading configuration from file");
                AppConfig::from_file(&path)?
            }
            None => AppConfig::default(),
        };

        apply_overrides(&mut config, |key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
        }

        if let Ok(path) = env::var("GPLAY_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `GPLAY_*` overrides read through `lookup`.
///
/// Unparseable numeric values are ignored and the current value is kept.
pub(crate) fn apply_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    // HTTP
    if let Some(val) = lookup("GPLAY_HTTP_HOST") {
        config.http.host = val;
    }
    if let Some(port) = lookup("GPLAY_HTTP_PORT").and_then(|v| v.parse().ok()) {
        config.http.port = port;
    }
    if let Some(val) = lookup("GPLAY_BASE_PATH") {
        config.http.base_path = val;
    }
    if let Some(val) = lookup("GPLAY_PUBLIC_SCHEME") {
        config.http.public_scheme = val;
    }
    if let Some(val) = lookup("GPLAY_CORS_ORIGINS") {
        config.http.cors_origins = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    // Provider
    if let Some(val) = lookup("GPLAY_PROVIDER_URL") {
        config.provider.base_url = val;
    }
    if let Some(ms) = lookup("GPLAY_PROVIDER_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        config.provider.timeout_ms = ms;
    }
    if let Some(ms) = lookup("GPLAY_PROVIDER_CONNECT_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        config.provider.connect_timeout_ms = ms;
    }

    // Lookup defaults
    if let Some(val) = lookup("GPLAY_DEFAULT_LANG") {
        config.defaults.lang = val;
    }
    if let Some(val) = lookup("GPLAY_DEFAULT_COUNTRY") {
        config.defaults.country = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        apply_overrides(
            &mut config,
            lookup_from(&[
                ("GPLAY_HTTP_PORT", "8081"),
                ("GPLAY_BASE_PATH", "/store"),
                ("GPLAY_CORS_ORIGINS", "http://a.test, http://b.test,"),
                ("GPLAY_PROVIDER_URL", "http://bridge:4000"),
                ("GPLAY_PROVIDER_TIMEOUT_MS", "1500"),
                ("GPLAY_DEFAULT_COUNTRY", "gb"),
            ]),
        );

        assert_eq!(config.http.port, 8081);
        assert_eq!(config.http.base_path, "/store");
        assert_eq!(config.http.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.provider.base_url, "http://bridge:4000");
        assert_eq!(config.provider.timeout_ms, 1500);
        assert_eq!(config.defaults.country, "gb");
        assert_eq!(config.defaults.lang, "en");
    }

    #[test]
    fn test_unparseable_number_is_ignored() {
        let mut config = AppConfig::default();
        apply_overrides(&mut config, lookup_from(&[("GPLAY_HTTP_PORT", "eighty")]));
        assert_eq!(config.http.port, 3000);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nport = 9999\nbase_path = \"/v2\"").unwrap();

        let config = ConfigLoader::with_path(file.path()).load().unwrap();
        assert_eq!(config.http.port, 9999);
        assert_eq!(config.http.base_path, "/v2");
    }
}
