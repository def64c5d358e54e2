//! Application configuration.

use crate::environment::Environment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::{fs, path::Path};
use thiserror::Error;

/// Environment variable overriding the configured backend URL.
pub const BACKEND_URL_VAR: &str = "SITEBUILDER_BACKEND_URL";
/// Environment variable overriding the configured API key.
pub const API_KEY_VAR: &str = "SITEBUILDER_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine the home directory")]
    NoHomeDir,

    #[error("No API key configured. Run `configure --api-key <KEY>` or set SITEBUILDER_API_KEY")]
    MissingApiKey,

    #[error("Invalid backend URL: {0}")]
    InvalidBackendUrl(String),

    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// Base URL of the backend project, or `local`.
    #[serde(default)]
    pub backend_url: String,
    /// Key sent as `apikey` and bearer token on every request.
    #[serde(default)]
    pub api_key: String,
}

impl Config {
    /// Create Config with the given connection credentials.
    pub fn new(backend_url: String, api_key: String) -> Self {
        Config {
            backend_url,
            api_key,
        }
    }

    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Removes the configuration file, if present.
    pub fn clear(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Merges connection settings: explicit values win over environment
    /// variables, which win over the stored file.
    pub fn resolve(
        stored: Option<Config>,
        backend_url: Option<String>,
        api_key: Option<String>,
    ) -> Result<(Environment, String), ConfigError> {
        let stored = stored.unwrap_or_default();
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let url = non_empty(backend_url)
            .or_else(|| non_empty(std::env::var(BACKEND_URL_VAR).ok()))
            .unwrap_or(stored.backend_url);
        let key = non_empty(api_key)
            .or_else(|| non_empty(std::env::var(API_KEY_VAR).ok()))
            .or_else(|| non_empty(Some(stored.api_key)))
            .ok_or(ConfigError::MissingApiKey)?;

        let environment = url
            .parse::<Environment>()
            .map_err(|_| ConfigError::InvalidBackendUrl(url.clone()))?;
        Ok((environment, key))
    }
}

/// Directory holding the config file and the console log.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    let home = home::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".sitebuilder"))
}

/// Location of the JSON config file.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(get_config_dir()?.join("config.json"))
}
