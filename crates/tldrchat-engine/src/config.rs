//! Configuration for tldrchat.
//!
//! Stored as JSON; every field has a default so a partial (or missing) file
//! is always usable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::reveal::DEFAULT_CADENCE;

/// Reply service used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://telegrambot-znt2.onrender.com/chat";

/// Config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".tldrchat/config.json";

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// URL of the reply-generation service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Milliseconds between two reveal frames.
    #[serde(default = "default_reveal_interval_ms")]
    pub reveal_interval_ms: u64,

    /// Request timeout in seconds. `None` leaves the transport default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Initial color theme.
    #[serde(default)]
    pub theme: ThemeName,

    /// Whether the sidebar starts open.
    #[serde(default)]
    pub sidebar_open: bool,

    /// Directory for TUI log files.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

#[allow(clippy::cast_possible_truncation)]
fn default_reveal_interval_ms() -> u64 {
    DEFAULT_CADENCE.as_millis() as u64
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".tldrchat").join("logs")
}

/// Color theme name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            ThemeName::Dark => ThemeName::Light,
            ThemeName::Light => ThemeName::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeName::Dark => "dark",
            ThemeName::Light => "light",
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Pause between reveal frames.
    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms)
    }

    /// Request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            reveal_interval_ms: default_reveal_interval_ms(),
            request_timeout_secs: None,
            theme: ThemeName::default(),
            sidebar_open: false,
            log_dir: default_log_dir(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.reveal_interval(), Duration::from_millis(20));
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.theme, ThemeName::Dark);
        assert!(!config.sidebar_open);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"theme":"light","request_timeout_secs":30}"#).unwrap();
        assert_eq!(config.theme, ThemeName::Light);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.reveal_interval_ms, 20);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            endpoint: "http://localhost:8080/chat".into(),
            sidebar_open: true,
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(ThemeName::Dark.toggled(), ThemeName::Light);
        assert_eq!(ThemeName::Light.toggled().as_str(), "dark");
    }
}
