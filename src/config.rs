// File: src/config.rs
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const URL_ENV: &str = "EVENTDECK_URL";

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL; collections live at `{url}/users` etc.
    pub url: String,
    pub allow_insecure_certs: bool,
    /// Written as `createdBy` on events created from this client.
    pub author_id: String,
    /// How long a notification stays in the status bar.
    pub notification_seconds: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            allow_insecure_certs: false,
            author_id: "1".to_string(),
            notification_seconds: 5,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&AppPaths::config_file())?;
        if let Ok(url) = std::env::var(URL_ENV)
            && !url.trim().is_empty()
        {
            config.url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Missing file means defaults; missing keys take their default too.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&AppPaths::config_file())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(write_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "url must not be empty".to_string(),
            });
        }
        if self.notification_seconds == 0 {
            return Err(ConfigError::Validation {
                message: "notification_seconds must be at least 1".to_string(),
            });
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation {
                message: format!(
                    "unknown log_level '{}' (expected one of {})",
                    self.log_level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        Ok(())
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
