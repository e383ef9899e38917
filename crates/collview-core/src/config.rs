use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::CollviewError;
use crate::models::theme::Theme;

/// Base URL used when none is configured: a local development backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8005/api/v1";

/// Top-level collview configuration, stored at `~/.collview/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollviewConfig {
    /// Base URL the `/collections/` paths are appended to.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: Url,

    /// Theme used when no host theme service is available.
    #[serde(default)]
    pub theme: Theme,

    /// Run with the development host services instead of none.
    #[serde(default)]
    pub dev_mode: bool,
}

fn default_api_base_url() -> Url {
    Url::parse(DEFAULT_API_BASE_URL).expect("default API URL is valid")
}

impl Default for CollviewConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            theme: Theme::default(),
            dev_mode: false,
        }
    }
}

impl CollviewConfig {
    /// Returns the collview home directory (`~/.collview/`).
    pub fn home_dir() -> Result<PathBuf, CollviewError> {
        let base = dirs::home_dir().ok_or_else(|| CollviewError::Config {
            message: "could not determine home directory".into(),
        })?;
        Ok(base.join(".collview"))
    }

    pub fn config_path() -> Result<PathBuf, CollviewError> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Returns the path of the local key-value storage file.
    pub fn storage_path() -> Result<PathBuf, CollviewError> {
        Ok(Self::home_dir()?.join("local_storage.json"))
    }

    /// Load config from the default location, or return defaults if not found.
    pub fn load() -> Result<Self, CollviewError> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, CollviewError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CollviewError::Serialization(e.to_string()))
    }

    pub fn save(&self) -> Result<(), CollviewError> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CollviewError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CollviewError::Serialization(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Initialize the collview home directory with default config.
    pub fn init() -> Result<PathBuf, CollviewError> {
        let home = Self::home_dir()?;
        std::fs::create_dir_all(&home)?;

        let config_path = Self::config_path()?;
        if !config_path.exists() {
            Self::default().save_to(&config_path)?;
        }

        Ok(home)
    }

    /// Replace the base URL, e.g. from a command-line override.
    pub fn with_api_base_url(mut self, url: &str) -> Result<Self, CollviewError> {
        self.api_base_url = Url::parse(url).map_err(|e| CollviewError::Config {
            message: format!("invalid API URL '{url}': {e}"),
        })?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrip() {
        let config = CollviewConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: CollviewConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(config.api_base_url, deserialized.api_base_url);
        assert_eq!(config.theme, deserialized.theme);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: CollviewConfig = toml::from_str("theme = \"dark\"\n").unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8005/api/v1");
        assert!(!config.dev_mode);
    }

    #[test]
    fn test_save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = CollviewConfig::default()
            .with_api_base_url("https://example.test/api")
            .unwrap();
        config.dev_mode = true;
        config.save_to(&path).unwrap();

        let loaded = CollviewConfig::load_from(&path).unwrap();
        assert_eq!(loaded.api_base_url.as_str(), "https://example.test/api");
        assert!(loaded.dev_mode);
    }

    #[test]
    fn test_invalid_url_override() {
        let err = CollviewConfig::default()
            .with_api_base_url("not a url")
            .unwrap_err();
        assert!(matches!(err, CollviewError::Config { .. }));
    }
}
