//! Configuration loading and management.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tl_core::Calendar;

/// Legacy variable naming the log directory.
pub const LEGACY_LOG_DIR_VAR: &str = "POMODORO_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("log directory is not configured (set TL_LOG_DIR or POMODORO_DIR)")]
    MissingLogDir,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory holding the week files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// First day of the week for date boundary lookups.
    #[serde(default = "default_week_start")]
    pub week_start: Weekday,
}

const fn default_week_start() -> Weekday {
    Weekday::Mon
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: None,
            week_start: default_week_start(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Legacy POMODORO_DIR, overridden by TL_LOG_DIR
        figment = figment.merge(
            Env::raw()
                .only(&[LEGACY_LOG_DIR_VAR])
                .map(|_| "log_dir".into()),
        );

        // Load from environment variables (TL_*)
        figment = figment.merge(Env::prefixed("TL_"));

        figment.extract()
    }

    /// The configured log directory.
    pub fn log_dir(&self) -> Result<&Path, ConfigError> {
        self.log_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(ConfigError::MissingLogDir)
    }

    pub const fn calendar(&self) -> Calendar {
        Calendar::new(self.week_start)
    }
}

/// Returns the platform-specific config directory for tl.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tl"))
}
