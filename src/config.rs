use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    API_BASE_ENV, CONFIG_DIR, CONFIG_FILE, DEFAULT_API_BASE, DEFAULT_CONFIRMATION_MS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SEARCH_LIMIT, DEFAULT_TIMESTAMP_FORMAT,
};
use crate::renderer::is_valid_timestamp_format;

/// User configuration, read from `~/.threadview/config.yaml`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API root; paths such as `/comments` are appended to it
    pub api_base: String,
    pub search_limit: usize,
    pub confirmation_ms: u64,
    pub request_timeout_secs: u64,
    pub timestamp_format: String,
    /// Pre-fills the user id field of the create form
    pub default_user_id: Option<i64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: String::from(DEFAULT_API_BASE),
            search_limit: DEFAULT_SEARCH_LIMIT,
            confirmation_ms: DEFAULT_CONFIRMATION_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            timestamp_format: String::from(DEFAULT_TIMESTAMP_FORMAT),
            default_user_id: None,
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
            .join(CONFIG_FILE)
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::default_path())?;
        Ok(config.with_api_base(std::env::var(API_BASE_ENV).ok()))
    }

    /// Replace `api_base` when an override is given
    pub fn with_api_base(mut self, base: Option<String>) -> Self {
        if let Some(base) = base.filter(|b| !b.trim().is_empty()) {
            self.api_base = base.trim().to_string();
        }
        self.normalized()
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        if !is_valid_timestamp_format(&config.timestamp_format) {
            bail!(
                "invalid timestamp_format {:?} in {}",
                config.timestamp_format,
                path.display()
            );
        }
        Ok(config.normalized())
    }

    /// Write the config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    fn normalized(mut self) -> Self {
        self.api_base = self.api_base.trim_end_matches('/').to_string();
        if self.search_limit == 0 {
            self.search_limit = DEFAULT_SEARCH_LIMIT;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = DEFAULT_REQUEST_TIMEOUT_SECS;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_ms)
    }
}
