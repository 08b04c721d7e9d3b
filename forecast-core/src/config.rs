use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::convert::ViewerZone;

pub const DEFAULT_API_HOST: &str = "rapidweather.p.rapidapi.com";
pub const DEFAULT_CITY: &str = "London,UK";
pub const DEFAULT_SUCCESS_CODE: &str = "200";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// api_host = "rapidweather.p.rapidapi.com"
/// default_city = "London,UK"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Value of the `x-rapidapi-key` header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Value of the `x-rapidapi-host` header; also the default request host.
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Overrides `https://{api_host}` as the request base.
    #[serde(default)]
    pub base_url: Option<String>,

    /// City looked up on start-up.
    #[serde(default = "default_city")]
    pub default_city: String,

    /// `cod` value a successful payload carries.
    #[serde(default = "default_success_code")]
    pub success_code: String,

    /// Fixed viewer offset from UTC; the system zone when absent.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

fn default_api_host() -> String {
    DEFAULT_API_HOST.to_string()
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

fn default_success_code() -> String {
    DEFAULT_SUCCESS_CODE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_host: default_api_host(),
            base_url: None,
            default_city: default_city(),
            success_code: default_success_code(),
            utc_offset_minutes: None,
        }
    }
}

impl Config {
    /// Returns the API key, or a hint on how to configure one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `forecast configure` and enter your API key."
                )
            })
    }

    /// Base URL requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.api_host),
        }
    }

    pub fn viewer_zone(&self) -> Result<ViewerZone> {
        match self.utc_offset_minutes {
            None => Ok(ViewerZone::System),
            Some(minutes) => ViewerZone::from_offset_minutes(minutes)
                .ok_or_else(|| anyhow!("utc_offset_minutes out of range: {minutes}")),
        }
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast-widget", "forecast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
