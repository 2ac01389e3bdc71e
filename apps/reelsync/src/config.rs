//! Configuration module for reelsync.
//!
//! Loads the TMDB credentials from `credentials.toml` with environment variable overrides.

use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org";
pub const DEFAULT_SEARCH_QUERY: &str = "matrix";

/// Main configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

/// TMDB API configuration
#[derive(Clone, Deserialize)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
}

// Custom Debug implementation to avoid exposing api_key
impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tmdb_base_url(),
        }
    }
}

fn default_tmdb_base_url() -> String {
    DEFAULT_TMDB_BASE_URL.to_string()
}

/// Scenario inputs
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_search_query")]
    pub search_query: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            search_query: default_search_query(),
        }
    }
}

fn default_search_query() -> String {
    DEFAULT_SEARCH_QUERY.to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. `credentials.toml` in current directory (optional)
    /// 3. Environment variables with `REELSYNC_` prefix
    ///
    /// Environment variables use double underscore for nesting:
    /// - `REELSYNC_TMDB__API_KEY=xxxx` sets `tmdb.api_key`
    /// - `REELSYNC_SCENARIO__SEARCH_QUERY=alien` sets `scenario.search_query`
    pub fn load() -> Result<Self, AppError> {
        Self::load_from("credentials")
    }

    /// Load configuration from a specific file path.
    ///
    /// The extension may be omitted; `credentials` resolves to `credentials.toml`.
    pub fn load_from(config_path: &str) -> Result<Self, AppError> {
        let config = ConfigLoader::builder()
            .set_default("tmdb.base_url", DEFAULT_TMDB_BASE_URL)?
            .set_default("scenario.search_query", DEFAULT_SEARCH_QUERY)?
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("REELSYNC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;

        if config.tmdb.api_key.is_none() {
            tracing::warn!("TMDB API key not configured - remote reads will fail");
        }

        Ok(config)
    }

    /// The TMDB API key, which must be present and non-blank.
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        match self.tmdb.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(AppError::MissingApiKey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_credentials(contents: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("credentials.toml")).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        dir
    }

    fn load_dir(dir: &tempfile::TempDir) -> Config {
        let path = dir.path().join("credentials.toml");
        Config::load_from(path.to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::load_from("nonexistent.toml").unwrap();
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org");
        assert_eq!(config.scenario.search_query, "matrix");
    }

    #[test]
    fn test_load_credentials_file() {
        let dir = write_credentials(
            r#"
            [tmdb]
            api_key = "abc123"

            [scenario]
            search_query = "alien"
            "#,
        );
        let config = load_dir(&dir);
        assert_eq!(config.tmdb.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org");
        assert_eq!(config.scenario.search_query, "alien");
        assert_eq!(config.require_api_key().unwrap(), "abc123");
    }

    #[test]
    fn test_base_url_override() {
        let dir = write_credentials(
            r#"
            [tmdb]
            api_key = "k"
            base_url = "http://127.0.0.1:9999"
            "#,
        );
        let config = load_dir(&dir);
        assert_eq!(config.tmdb.base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let config = Config::default();
        assert!(matches!(
            config.require_api_key(),
            Err(AppError::MissingApiKey)
        ));
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let dir = write_credentials("[tmdb]\napi_key = \"   \"\n");
        let config = load_dir(&dir);
        assert!(matches!(
            config.require_api_key(),
            Err(AppError::MissingApiKey)
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = TmdbConfig {
            api_key: Some("super-secret".to_string()),
            base_url: default_tmdb_base_url(),
        };
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }
}
