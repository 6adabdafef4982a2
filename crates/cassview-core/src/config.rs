//! Configuration management.
//!
//! Loads configuration from ${CASSVIEW_HOME}/config.toml with defaults for
//! every missing key.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! CASSVIEW_HOME resolution order:
    //! 1. CASSVIEW_HOME environment variable (if set)
    //! 2. ~/.config/cassview
    //! 3. ./.cassview when no home directory can be determined

    use std::path::PathBuf;

    pub fn cassview_home() -> PathBuf {
        if let Ok(home) = std::env::var("CASSVIEW_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".cassview"),
            |h| h.join(".config").join("cassview"),
        )
    }

    pub fn config_path() -> PathBuf {
        cassview_home().join("config.toml")
    }

    /// Directory holding the rolling log files.
    pub fn logs_dir() -> PathBuf {
        cassview_home().join("logs")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Binary used for every index call
    pub cass_bin: String,

    /// Hits requested per agent
    pub search_limit: usize,

    pub search_timeout_secs: u64,
    pub reindex_timeout_secs: u64,
    pub export_timeout_secs: u64,

    /// Scope queries to the launch workspace
    pub filter_by_workspace: bool,

    /// Notification lifetime in seconds
    pub notification_secs: u64,

    /// Fallback for RUST_LOG
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cass_bin: Self::DEFAULT_CASS_BIN.to_string(),
            search_limit: Self::DEFAULT_SEARCH_LIMIT,
            search_timeout_secs: Self::DEFAULT_SEARCH_TIMEOUT_SECS,
            reindex_timeout_secs: Self::DEFAULT_REINDEX_TIMEOUT_SECS,
            export_timeout_secs: Self::DEFAULT_EXPORT_TIMEOUT_SECS,
            filter_by_workspace: false,
            notification_secs: Self::DEFAULT_NOTIFICATION_SECS,
            log_filter: Self::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    const DEFAULT_CASS_BIN: &str = "cass";
    const DEFAULT_SEARCH_LIMIT: usize = 100;
    const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_REINDEX_TIMEOUT_SECS: u64 = 300;
    const DEFAULT_EXPORT_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_NOTIFICATION_SECS: u64 = 4;
    const DEFAULT_LOG_FILTER: &str = "info";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a commented default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn reindex_timeout(&self) -> Duration {
        Duration::from_secs(self.reindex_timeout_secs)
    }

    pub fn export_timeout(&self) -> Duration {
        Duration::from_secs(self.export_timeout_secs)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename).
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}
