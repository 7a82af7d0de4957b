//! Configuration management for mflix
//!
//! Handles config file loading/saving.
//! Config is stored at ~/.config/mflix/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default catalog API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://mflix.moleniuk.com/api";

/// Default catalog poll interval for the notification poller
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Default number of cards visible per carousel page
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Catalog API base URL
    pub api_base_url: Option<String>,
    /// Notification poll interval in seconds
    pub poll_interval_secs: Option<u64>,
    /// Cards per carousel page
    pub page_size: Option<usize>,
}

impl Config {
    /// Get config file path (~/.config/mflix/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mflix").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit path (CLI --config flag)
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// API base URL with fallback chain:
    /// 1. Environment variable MFLIX_API_URL
    /// 2. Config file value
    /// 3. Built-in default
    pub fn api_base_url(&self) -> String {
        if let Ok(url) = std::env::var("MFLIX_API_URL") {
            return url;
        }
        self.api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS))
    }

    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }
}
