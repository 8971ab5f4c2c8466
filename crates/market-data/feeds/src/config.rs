//! Directory cache and refresh configuration

use crate::error::{FeedError, Result};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment key overriding [`DirectoryConfig::cache_dir`]
pub const ENV_CACHE_DIR: &str = "TICKMAP_CACHE_DIR";
/// Environment key overriding [`DirectoryConfig::refresh_hour`]
pub const ENV_REFRESH_HOUR: &str = "TICKMAP_REFRESH_HOUR";
/// Environment key overriding [`DirectoryConfig::refresh_window_minutes`]
pub const ENV_REFRESH_WINDOW: &str = "TICKMAP_REFRESH_WINDOW_MINUTES";

/// Directory configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Cache directory for directory snapshots
    pub cache_dir: PathBuf,

    /// Local hour at which the directory is refreshed (default: 8 AM)
    pub refresh_hour: u32,

    /// Minutes after `refresh_hour` during which a refresh is due
    pub refresh_window_minutes: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./cache/instruments"),
            refresh_hour: 8,
            refresh_window_minutes: 5,
        }
    }
}

impl DirectoryConfig {
    /// Defaults overlaid with `TICKMAP_*` environment variables
    ///
    /// # Errors
    /// `InvalidConfig` when a numeric variable does not parse or the hour
    /// is out of range.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with values returned by `lookup` for each key
    ///
    /// # Errors
    /// Same as [`DirectoryConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_CACHE_DIR) {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(hour) = parse_value::<u32>(ENV_REFRESH_HOUR, lookup(ENV_REFRESH_HOUR))? {
            if hour > 23 {
                return Err(FeedError::InvalidConfig {
                    key: ENV_REFRESH_HOUR,
                    value: hour.to_string(),
                });
            }
            config.refresh_hour = hour;
        }
        if let Some(minutes) = parse_value::<u32>(ENV_REFRESH_WINDOW, lookup(ENV_REFRESH_WINDOW))? {
            config.refresh_window_minutes = minutes;
        }

        Ok(config)
    }

    /// Whether a directory refresh is due at the given local time
    #[must_use]
    pub fn should_refresh_at(&self, now: NaiveTime) -> bool {
        now.hour() == self.refresh_hour && now.minute() < self.refresh_window_minutes
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: Option<String>) -> Result<Option<T>> {
    match value {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| FeedError::InvalidConfig { key, value }),
        None => Ok(None),
    }
}
