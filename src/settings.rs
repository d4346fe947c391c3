//! User settings
//!
//! Persisted as JSON in the key-value store under [`SETTINGS_KEY`]. Missing
//! fields take their defaults, so older stored settings keep loading.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::{Coordinate, GridLocator};
use crate::reference::DEFAULT_THRESHOLD_DEG;

pub const SETTINGS_KEY: &str = "hamlog_settings";

/// Position used when no usable home locator is configured (central Italy)
pub const DEFAULT_HOME: Coordinate = Coordinate {
    latitude: 41.8719,
    longitude: 12.5674,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub my_call: String,
    /// Remote logbook API key
    pub api_key: String,
    pub my_locator: String,
    pub parks_enabled: bool,
    pub summits_enabled: bool,
    pub spots_enabled: bool,
    pub refresh_interval_secs: u64,
    pub audio_recording_enabled: bool,
    pub auto_sync_enabled: bool,
    pub reference_threshold_deg: f64,
    pub provider_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            my_call: String::new(),
            api_key: String::new(),
            my_locator: String::new(),
            parks_enabled: true,
            summits_enabled: true,
            spots_enabled: true,
            refresh_interval_secs: 60,
            audio_recording_enabled: true,
            auto_sync_enabled: false,
            reference_threshold_deg: DEFAULT_THRESHOLD_DEG,
            provider_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Centre of the configured home locator, or [`DEFAULT_HOME`]
    pub fn home_coordinate(&self) -> Coordinate {
        if self.my_locator.trim().is_empty() {
            return DEFAULT_HOME;
        }
        match GridLocator::parse(&self.my_locator) {
            Ok(grid) => grid.center(),
            Err(e) => {
                log::warn!("Home locator unusable, using default position: {}", e);
                DEFAULT_HOME
            }
        }
    }

    pub fn require_api_key(&self) -> Result<&str> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(Error::Config("remote logbook API key is not set".to_string()));
        }
        Ok(key)
    }

    /// Read one setting by its CLI name
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "my-call" => self.my_call.clone(),
            "api-key" => mask(&self.api_key),
            "my-locator" => self.my_locator.clone(),
            "parks-enabled" => self.parks_enabled.to_string(),
            "summits-enabled" => self.summits_enabled.to_string(),
            "spots-enabled" => self.spots_enabled.to_string(),
            "refresh-interval" => self.refresh_interval_secs.to_string(),
            "audio-recording" => self.audio_recording_enabled.to_string(),
            "auto-sync" => self.auto_sync_enabled.to_string(),
            "reference-threshold" => self.reference_threshold_deg.to_string(),
            "provider-timeout" => self.provider_timeout_secs.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Update one setting by its CLI name, validating the value
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "my-call" => self.my_call = value.to_uppercase(),
            "api-key" => self.api_key = value.to_string(),
            "my-locator" => {
                self.my_locator = if value.is_empty() {
                    String::new()
                } else {
                    GridLocator::parse(value)?.to_string()
                }
            }
            "parks-enabled" => self.parks_enabled = parse_bool(key, value)?,
            "summits-enabled" => self.summits_enabled = parse_bool(key, value)?,
            "spots-enabled" => self.spots_enabled = parse_bool(key, value)?,
            "refresh-interval" => self.refresh_interval_secs = parse_num(key, value)?,
            "audio-recording" => self.audio_recording_enabled = parse_bool(key, value)?,
            "auto-sync" => self.auto_sync_enabled = parse_bool(key, value)?,
            "reference-threshold" => {
                let threshold: f64 = parse_num(key, value)?;
                if !threshold.is_finite() || threshold <= 0.0 {
                    return Err(Error::InvalidInput(format!(
                        "{} must be positive, got {}",
                        key, value
                    )));
                }
                self.reference_threshold_deg = threshold;
            }
            "provider-timeout" => self.provider_timeout_secs = parse_num(key, value)?,
            _ => return Err(Error::Config(format!("unknown setting '{}'", key))),
        }
        Ok(())
    }

    /// Settings as safe to log (API key masked)
    pub fn redacted(&self) -> Settings {
        Settings {
            api_key: mask(&self.api_key),
            ..self.clone()
        }
    }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "***".to_string()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::InvalidInput(format!("{} expects a boolean, got '{}'", key, value))),
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::InvalidInput(format!("{} expects a number, got '{}'", key, value)))
}
