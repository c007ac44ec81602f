use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;

use crate::calendar::WeekStart;
use crate::theme::ThemeConfig;

pub const APP_NAME: &str = "calendar-notes";
pub const DEFAULT_EVENTS_FILE: &str = "events.json";
/// Overrides the event document path from the config file.
pub const EVENTS_FILE_ENV: &str = "CALENDAR_NOTES_FILE";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub events_file: Option<PathBuf>,
    pub week_start: WeekStart,
    pub log: LogConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Reads the config file from the user config directory. A missing file
    /// yields the defaults.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&content)
            .wrap_err_with(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Event document path: `override_path`, then `events_file`, then
    /// `events.json` in the working directory.
    pub fn events_path(&self, override_path: Option<PathBuf>) -> PathBuf {
        override_path
            .or_else(|| self.events_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EVENTS_FILE))
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.log
            .dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|d| d.join(APP_NAME).join("logs")))
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join("config.toml"))
}
