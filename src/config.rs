use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::theme::ThemeConfig;
use crate::todo::SortOrder;

/// Overrides `api.base_url`.
pub const API_URL_ENV: &str = "TODO_TUI_API_URL";

const APP_DIR: &str = "todo-tui";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub view: ViewConfig,
    pub log: LogConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub default_sort: SortOrder,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join(APP_DIR).join("todo-tui.log")))
    }
}

impl Config {
    /// Load the user config, falling back to defaults when there is none,
    /// then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api.base_url = url;
            }
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.view.default_sort, SortOrder::DueDate);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = Config::parse(
            r##"
            [api]
            base_url = "https://todo.example.com/api"

            [view]
            default_sort = "created"

            [log]
            file = "/tmp/todo.log"

            [theme]
            preset = "nord"
            today_bg = "#ff0000"
            "##,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://todo.example.com/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.view.default_sort, SortOrder::Created);
        assert_eq!(config.log.file_path(), Some(PathBuf::from("/tmp/todo.log")));
        assert_eq!(config.theme.preset.as_deref(), Some("nord"));
    }

    #[test]
    fn zero_timeout_is_raised() {
        let config = Config::parse("[api]\ntimeout_secs = 0").unwrap();
        assert_eq!(config.api.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn bad_sort_is_rejected() {
        assert!(Config::parse("[view]\ndefault_sort = \"alphabetical\"").is_err());
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = Config::from_file(Path::new("/nonexistent/todo-tui/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/todo-tui/config.toml"));
    }
}
