use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use directories::ProjectDirs;

use crate::error::{ConfigError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const API_URL_ENV: &str = "PLANNER_API_URL";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    /// Request timeout; unset means requests wait for the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl Config {
    pub fn new(api_url: String) -> Self {
        Config {
            api_url,
            ..Config::default()
        }
    }

    pub fn get_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "pmo", "planner")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }

    /// Loads the stored config, falling back to defaults, then applies
    /// the `PLANNER_API_URL` override.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path().ok_or(ConfigError::NoConfigDir)?;
        let mut config = Self::load_from(&config_path)?;

        if let Ok(url) = env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!(api_url = %url, "Using API URL from environment");
                config.api_url = url.trim().to_string();
            }
        }

        Ok(config)
    }

    /// Reads a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_data = fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        let config: Config = serde_json::from_str(&config_data)
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::DirectoryCreationFailed(e.to_string()))?;
        }

        let config_data = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        fs::write(path, config_data).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(())
    }

    /// Sets the API URL after checking it looks like an http(s) base URL
    pub fn set_api_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(url.to_string()).into());
        }
        self.api_url = url.to_string();
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set_api_url("https://pmo.example.org/api/").unwrap();
        config.timeout_secs = Some(5);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_url, "https://pmo.example.org/api");
        assert_eq!(loaded.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_missing_timeout_means_no_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_url": "http://10.0.0.2:8000/api"}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timeout_secs, None);
        assert_eq!(loaded.timeout(), None);
    }

    #[test]
    fn test_stored_timeout_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_url": "http://10.0.0.2:8000/api", "timeout_secs": 20}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timeout(), Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_unset_timeout_is_not_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        Config::default().save_to(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("timeout_secs"));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = Config::default();
        assert!(config.set_api_url("localhost:8000").is_err());
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
