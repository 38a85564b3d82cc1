//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.clonetrack.toml` files, and resolving the GitHub credentials that
//! only ever come from the command line or the environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".clonetrack.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data file and output locations.
    #[serde(default)]
    pub storage: StorageConfig,

    /// GitHub API settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Chart and summary settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Where the store and the generated reports live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON clone store.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Directory receiving charts and the markdown summary.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("clone_data.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("graphs")
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// API root, override for GitHub Enterprise.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Repositories requested per listing page (GitHub caps this at 100).
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Upper bound on listing pages walked in one run.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            per_page: default_per_page(),
            max_pages: default_max_pages(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    50
}

fn default_timeout() -> u64 {
    30
}

/// Chart and summary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Repositories shown in the breakdown chart.
    #[serde(default = "default_breakdown_top")]
    pub breakdown_top: usize,

    /// Repositories drawn in the trend chart.
    #[serde(default = "default_trend_top")]
    pub trend_top: usize,

    /// Repositories listed in the markdown summary.
    #[serde(default = "default_summary_top")]
    pub summary_top: usize,

    /// Chart width in pixels.
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,

    /// Chart height in pixels.
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            breakdown_top: default_breakdown_top(),
            trend_top: default_trend_top(),
            summary_top: default_summary_top(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

fn default_breakdown_top() -> usize {
    15
}

fn default_trend_top() -> usize {
    5
}

fn default_summary_top() -> usize {
    10
}

fn default_chart_width() -> u32 {
    1200
}

fn default_chart_height() -> u32 {
    600
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data_file) = args.data_file {
            self.storage.data_file = data_file.clone();
        }
        if let Some(ref output_dir) = args.output_dir {
            self.storage.output_dir = output_dir.clone();
        }
        if let Some(ref api_url) = args.api_url {
            self.api.base_url = api_url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }
        if let Some(per_page) = args.per_page {
            self.api.per_page = per_page;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

/// A required setting was not supplied.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("{env} environment variable not set")]
    Missing { env: &'static str },
}

/// GitHub token and account name.
#[derive(Clone)]
pub struct Credentials {
    pub token: String,
    pub username: String,
}

impl Credentials {
    /// Resolve credentials from parsed arguments (which already fold in
    /// `GITHUB_TOKEN` and `GITHUB_USERNAME`). Blank values count as missing.
    pub fn from_args(args: &crate::cli::Args) -> Result<Self, CredentialsError> {
        let token = non_blank(args.token.as_deref())
            .ok_or(CredentialsError::Missing { env: "GITHUB_TOKEN" })?;
        let username = non_blank(args.username.as_deref())
            .ok_or(CredentialsError::Missing {
                env: "GITHUB_USERNAME",
            })?;

        Ok(Self {
            token: token.to_string(),
            username: username.to_string(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
