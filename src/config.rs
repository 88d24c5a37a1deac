//! Venue configuration file support.
//!
//! This module provides utilities for reading venue operating parameters
//! from TOML configuration files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::SchedulingError;
use crate::models::time::{DisplayHour, TimeRange};

/// Venue configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenueConfig {
    #[serde(default)]
    pub hours: VenueHours,
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Operating-hour settings, all in display hours (0–5 written as 24–29).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueHours {
    /// Earliest bookable display hour.
    #[serde(default = "default_open_hour")]
    pub open: u8,
    /// Latest bookable display hour (exclusive end of the window).
    #[serde(default = "default_close_hour")]
    pub close: u8,
    /// Regular business opening; early-open blocks end here.
    #[serde(default = "default_regular_open")]
    pub regular_open: u8,
    /// Regular business closing; overnight blocks start here.
    #[serde(default = "default_regular_close")]
    pub regular_close: u8,
}

/// Status-cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_status_ttl_secs")]
    pub status_ttl_secs: u64,
}

fn default_open_hour() -> u8 {
    10
}

fn default_close_hour() -> u8 {
    29
}

fn default_regular_open() -> u8 {
    12
}

fn default_regular_close() -> u8 {
    22
}

fn default_status_ttl_secs() -> u64 {
    30
}

impl Default for VenueHours {
    fn default() -> Self {
        Self {
            open: default_open_hour(),
            close: default_close_hour(),
            regular_open: default_regular_open(),
            regular_close: default_regular_close(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            status_ttl_secs: default_status_ttl_secs(),
        }
    }
}

impl VenueHours {
    /// The full bookable window as a range.
    pub fn operating_window(&self) -> Result<TimeRange, SchedulingError> {
        TimeRange::new(
            DisplayHour::from_display(self.open)?,
            DisplayHour::from_display(self.close)?,
        )
    }

    /// Validate the hour relationships.
    pub fn validate(&self) -> Result<(), SchedulingError> {
        self.operating_window()?;
        if !(self.open <= self.regular_open && self.regular_open < self.regular_close) {
            return Err(SchedulingError::validation(format!(
                "regular hours {}..{} must sit inside the operating window {}..{}",
                self.regular_open, self.regular_close, self.open, self.close
            )));
        }
        if self.regular_close > self.close {
            return Err(SchedulingError::validation(format!(
                "regular close {} past the end of the operating window {}",
                self.regular_close, self.close
            )));
        }
        Ok(())
    }
}

impl VenueConfig {
    /// Load venue configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchedulingError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            SchedulingError::validation(format!("Failed to read config file: {}", e))
        })?;

        let config: VenueConfig = toml::from_str(&content).map_err(|e| {
            SchedulingError::validation(format!("Failed to parse config file: {}", e))
        })?;

        config.hours.validate()?;
        Ok(config)
    }

    /// Load venue configuration from the default location.
    ///
    /// Searches for `venue.toml` in the current directory and its parent.
    pub fn from_default_location() -> Result<Self, SchedulingError> {
        let search_paths = vec![PathBuf::from("venue.toml"), PathBuf::from("../venue.toml")];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(SchedulingError::validation(
            "No venue.toml found in standard locations",
        ))
    }
}
