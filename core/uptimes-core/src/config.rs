//! Configuration loading.
//!
//! Settings come from `~/.uptimes/config.toml`, then environment overrides,
//! then whatever the caller applies on top (CLI flags). Everything is fixed
//! once a [`SessionTracker`](crate::SessionTracker) is built from it.
//!
//! ```toml
//! database = "~/.uptimes/uptimes.json"
//! keep_count = 10
//!
//! [auto_save]
//! enabled = true
//! interval_secs = 300
//!
//! [display]
//! order = "recency_first"
//! booted_first = true
//! timestamp_format = "%Y-%m-%d %H:%M:%S"
//! duration_style = "compact"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, UptimesError};
use crate::format::{
    is_valid_timestamp_format, strftime_timestamp, DurationStyle, PresentationFormatter,
    DEFAULT_TIMESTAMP_FORMAT,
};
use crate::ranking::DEFAULT_KEEP_COUNT;
use crate::storage::{expand_home, StoragePaths};
use crate::types::DisplayOrder;

pub const ENV_DATABASE: &str = "UPTIMES_DATABASE";
pub const ENV_KEEP_COUNT: &str = "UPTIMES_KEEP_COUNT";

const DEFAULT_AUTO_SAVE_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UptimesConfig {
    /// Database file. Defaults to `uptimes.json` under the storage root.
    #[serde(default)]
    pub database: Option<PathBuf>,
    #[serde(default = "default_keep_count")]
    pub keep_count: usize,
    #[serde(default)]
    pub auto_save: AutoSaveConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for UptimesConfig {
    fn default() -> Self {
        Self {
            database: None,
            keep_count: DEFAULT_KEEP_COUNT,
            auto_save: AutoSaveConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AutoSaveConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: DEFAULT_AUTO_SAVE_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    #[serde(default)]
    pub order: DisplayOrder,
    #[serde(default = "default_true")]
    pub booted_first: bool,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default)]
    pub duration_style: DurationStyle,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            order: DisplayOrder::default(),
            booted_first: true,
            timestamp_format: default_timestamp_format(),
            duration_style: DurationStyle::default(),
        }
    }
}

fn default_keep_count() -> usize {
    DEFAULT_KEEP_COUNT
}

fn default_true() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    DEFAULT_AUTO_SAVE_INTERVAL_SECS
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

/// Loads the config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<UptimesConfig> {
    if !path.exists() {
        return Ok(UptimesConfig::default());
    }

    let content = fs_err::read_to_string(path).map_err(|err| UptimesError::Io {
        context: format!("Failed to read config {}", path.display()),
        source: err,
    })?;
    let config =
        toml::from_str::<UptimesConfig>(&content).map_err(|err| UptimesError::ConfigMalformed {
            path: path.to_path_buf(),
            details: err.to_string(),
        })?;
    config.validate()?;
    Ok(config)
}

impl UptimesConfig {
    pub fn validate(&self) -> Result<()> {
        if self.keep_count == 0 {
            return Err(UptimesError::ConfigInvalid {
                field: "keep_count".to_string(),
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.auto_save.interval_secs == 0 {
            return Err(UptimesError::ConfigInvalid {
                field: "auto_save.interval_secs".to_string(),
                reason: "must be a positive number of seconds".to_string(),
            });
        }
        if !is_valid_timestamp_format(&self.display.timestamp_format) {
            return Err(UptimesError::ConfigInvalid {
                field: "display.timestamp_format".to_string(),
                reason: format!("unsupported pattern {:?}", self.display.timestamp_format),
            });
        }
        Ok(())
    }

    /// Applies `UPTIMES_DATABASE` / `UPTIMES_KEEP_COUNT` from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(database) = lookup(ENV_DATABASE).filter(|v| !v.trim().is_empty()) {
            self.database = Some(PathBuf::from(database));
        }
        if let Some(raw) = lookup(ENV_KEEP_COUNT) {
            self.keep_count = raw
                .trim()
                .parse()
                .map_err(|_| UptimesError::ConfigInvalid {
                    field: ENV_KEEP_COUNT.to_string(),
                    reason: format!("not a positive integer: {:?}", raw),
                })?;
        }
        Ok(())
    }

    /// The database file to use, with `~/` expanded.
    pub fn database_path(&self, paths: &StoragePaths) -> PathBuf {
        match &self.database {
            Some(path) => expand_home(path),
            None => paths.database_file(),
        }
    }

    pub fn auto_save_interval(&self) -> Duration {
        Duration::from_secs(self.auto_save.interval_secs)
    }

    pub fn formatter(&self) -> PresentationFormatter {
        PresentationFormatter::new(
            self.display.duration_style.formatter(),
            strftime_timestamp(self.display.timestamp_format.clone()),
        )
        .booted_first(self.display.booted_first)
    }
}
