//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\autotask-mapper\config.toml
//! - macOS: ~/Library/Application Support/autotask-mapper/config.toml
//! - Linux: ~/.config/autotask-mapper/config.toml
//!
//! Credentials can also come from the environment (see the CLI flags);
//! values given there win over the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials
    pub credentials: Credentials,

    /// Name-mapping cache settings
    pub mapping: MappingSettings,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// API user name (an API-only user's email address)
    pub username: Option<String>,

    /// API user secret
    pub secret: Option<String>,

    /// Tracking identifier of the API integration
    pub integration_code: Option<String>,

    /// Zone base URL, e.g. `https://webservices5.autotask.net/atservicesrest/v1.0`
    pub api_url: Option<String>,
}

impl Credentials {
    /// Overlay any values present in `other`.
    pub fn merge(&mut self, other: Credentials) {
        if other.username.is_some() {
            self.username = other.username;
        }
        if other.secret.is_some() {
            self.secret = other.secret;
        }
        if other.integration_code.is_some() {
            self.integration_code = other.integration_code;
        }
        if other.api_url.is_some() {
            self.api_url = other.api_url;
        }
    }
}

/// Name-mapping cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingSettings {
    /// Seconds before a domain's cached names are considered stale
    pub cache_ttl_secs: u64,

    /// Companies fetched per refresh
    pub company_page_size: u32,

    /// Resources fetched per refresh
    pub resource_page_size: u32,

    /// Start filling both caches as soon as the mapping service exists
    pub warm_up: bool,
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 30 * 60,
            company_page_size: 2000,
            resource_page_size: 500,
            warm_up: true,
        }
    }
}

impl MappingSettings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("autotask-mapper"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file, falling back to defaults
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(&path, config)
}

/// Save configuration to a specific file
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
