//! Configuration management module.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Backend REST API location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// `http` or `https`.
    pub protocol: String,
    pub host: String,
    pub port: u16,
    /// Path prefix prepended to every endpoint (may be empty).
    #[serde(default)]
    pub prefix: String,
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Quiet period before a search query is applied (default: 250).
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Initial state of the "Remember me" checkbox.
    #[serde(default)]
    pub remember_me_default: bool,
}

fn default_search_debounce_ms() -> u64 {
    250
}

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Per-user data directory (session file, logs).
    pub fn data_dir() -> PathBuf {
        ProjectDirs::from("lk", "ewis", "quotation-desk")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.protocol != "http" && self.api.protocol != "https" {
            return Err(ConfigError::Validation(
                "API protocol must be http or https".to_string(),
            ));
        }
        if self.api.host.trim().is_empty() {
            return Err(ConfigError::Validation("API host cannot be empty".to_string()));
        }
        if self.api.host.contains('/') || self.api.host.contains(' ') {
            return Err(ConfigError::Validation(
                "API host must be a bare host name or IP address".to_string(),
            ));
        }
        if self.api.port == 0 {
            return Err(ConfigError::Validation("API port must be greater than 0".to_string()));
        }
        if !self.api.prefix.is_empty() && !self.api.prefix.starts_with('/') {
            return Err(ConfigError::Validation(
                "API prefix must start with '/'".to_string(),
            ));
        }
        if self.ui.search_debounce_ms > 5_000 {
            return Err(ConfigError::Validation(
                "Search debounce cannot exceed 5000 ms".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}{}",
            self.protocol,
            self.host,
            self.port,
            self.prefix.trim_end_matches('/')
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 5000,
            prefix: String::new(),
        }
    }
}

impl UiConfig {
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
            remember_me_default: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url() {
        let api = ApiConfig {
            protocol: "https".to_string(),
            host: "erp.example.lk".to_string(),
            port: 8443,
            prefix: "/quotation/".to_string(),
        };
        assert_eq!(api.base_url(), "https://erp.example.lk:8443/quotation");
    }

    #[test]
    fn test_base_url_without_prefix() {
        let api = ApiConfig::default();
        assert_eq!(api.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_validation_empty_host() {
        let mut config = AppConfig::default();
        config.api.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_port() {
        let mut config = AppConfig::default();
        config.api.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_protocol() {
        let mut config = AppConfig::default();
        config.api.protocol = "ftp".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_prefix_slash() {
        let mut config = AppConfig::default();
        config.api.prefix = "api".to_string();
        assert!(config.validate().is_err());

        config.api.prefix = "/api".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ui_section_optional() {
        let content = r#"
            [api]
            protocol = "http"
            host = "10.0.0.5"
            port = 3000
        "#;
        let config: AppConfig = toml::from_str(content).unwrap();
        assert_eq!(config.ui.search_debounce_ms, 250);
        assert!(config.api.prefix.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_try_load_missing_and_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Missing));

        let mut config = AppConfig::default();
        config.api.host = "192.168.1.20".to_string();
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => assert_eq!(loaded.api.host, "192.168.1.20"),
            other => panic!("unexpected load result: {other:?}"),
        }
    }

    #[test]
    fn test_try_load_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nprotocol = 1").unwrap();
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Invalid(_)));
    }
}
