//! corkboard configuration file handling
//!
//! Loads and manages the ~/.config/corkboard/config.yaml file.

use crate::retry::RetryConfig;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "CORKBOARD_API_URL";

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API (no trailing slash needed)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Serializable retry policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay between attempts in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Double the delay after each failure
    #[serde(default = "default_backoff")]
    pub backoff: bool,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_backoff() -> bool {
    true
}

impl RetrySettings {
    /// Settings matching `RetryConfig::drag()`
    pub fn drag() -> Self {
        Self::from(&RetryConfig::drag())
    }

    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            delay: Duration::from_millis(self.delay_ms),
            backoff: self.backoff,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
            backoff: default_backoff(),
        }
    }
}

impl From<&RetryConfig> for RetrySettings {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay_ms: config.delay.as_millis() as u64,
            backoff: config.backoff,
        }
    }
}

/// corkboard configuration
///
/// Represents the complete ~/.config/corkboard/config.yaml file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorkboardConfig {
    /// Backend connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Retry policy for ordinary requests
    #[serde(default)]
    pub retry: RetrySettings,

    /// Retry policy for persisting drag-and-drop reorders
    #[serde(default = "RetrySettings::drag")]
    pub drag_retry: RetrySettings,
}

impl CorkboardConfig {
    /// Create a configuration with every default
    pub fn new() -> Self {
        Self {
            api: ApiConfig::default(),
            retry: RetrySettings::default(),
            drag_retry: RetrySettings::drag(),
        }
    }

    /// Load configuration from the default path (~/.config/corkboard/config.yaml)
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        Self::load(&path)
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::CorkboardError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading corkboard configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(
            base_url = %config.api.base_url,
            timeout_secs = config.api.timeout_secs,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load from `path` (or the default path), falling back to defaults when
    /// the file does not exist, then apply environment overrides
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);

        let mut config = if path.exists() {
            Self::load(&path)?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Self::new()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `CORKBOARD_API_URL` if set
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!(url = %url, "Using API URL from environment");
                self.api.base_url = url.trim().to_string();
            }
        }
    }

    /// Save configuration to the default path
    pub fn save_default(&self) -> Result<()> {
        let path = Self::default_path();
        self.save(&path)
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving corkboard configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/corkboard/config.yaml)
    pub fn default_path() -> PathBuf {
        // Always use ~/.config for consistency across platforms (macOS, Linux)
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("corkboard");
        path.push("config.yaml");
        path
    }
}

impl Default for CorkboardConfig {
    fn default() -> Self {
        Self::new()
    }
}
