//! Configuration management.
//!
//! `Config` holds client settings: the API URL, the last email used to log
//! in and the directory for local snapshots. It is stored at
//! `~/.config/meritcamp/config.json`; the `MERITCAMP_API_URL` and
//! `MERITCAMP_DATA_DIR` environment variables override the stored values.
//!
//! `RegistryConfig` tunes the in-process registration engine.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::rules::DEFAULT_CLASS_SIZE;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "meritcamp";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// API used when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

const API_URL_ENV: &str = "MERITCAMP_API_URL";
const DATA_DIR_ENV: &str = "MERITCAMP_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub last_email: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// API base URL: environment, then config file, then the default
    pub fn api_url(&self) -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Directory for local snapshots: environment, config file, then the
    /// platform data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|s| !s.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir =
            dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Directory for the session file and logs
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

/// Tuning for the in-process registration engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Class size for offerings that do not set one
    pub default_size_limit: u32,
    /// Lifetime of issued session tokens
    pub session_expiry_minutes: i64,
    pub min_password_length: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_size_limit: DEFAULT_CLASS_SIZE,
            session_expiry_minutes: crate::auth::session::TOKEN_EXPIRY_MINUTES,
            min_password_length: 8,
        }
    }
}
