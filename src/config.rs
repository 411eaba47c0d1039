//! Application configuration.
//!
//! Configuration is a TOML file (path from `SWX_CONFIG`, default
//! `swx.toml`) with serde defaults for every field, so the server runs
//! out of the box against the public APIs with the `DEMO_KEY`. The
//! `DONKI_API_KEY` environment variable overrides the configured key.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Expected CME speed range for one flare class letter, km/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub donki_base_url: String,
    pub noaa_base_url: String,
    pub api_key: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            donki_base_url: "https://api.nasa.gov/DONKI/".to_string(),
            noaa_base_url: "https://services.swpc.noaa.gov/".to_string(),
            api_key: "DEMO_KEY".to_string(),
        }
    }
}

/// Tunable thresholds for the correlation and scoring engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Trailing-edge CME association window after the flare peak.
    pub cme_association_window_hours: f64,
    /// Window for the quick-succession detector.
    pub quick_succession_window_minutes: i64,
    /// Flare count (including the current flare) that triggers the
    /// quick-succession detector.
    pub quick_succession_threshold: usize,
    /// Expected CME speed range per flare class letter.
    pub expected_speed_ranges: BTreeMap<String, SpeedRange>,
    /// Human-readable descriptions for magnetic classification codes.
    pub magnetic_class_descriptions: BTreeMap<String, String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let expected_speed_ranges = BTreeMap::from([
            ("A".to_string(), SpeedRange { min: 50.0, max: 300.0 }),
            ("B".to_string(), SpeedRange { min: 100.0, max: 500.0 }),
            ("C".to_string(), SpeedRange { min: 300.0, max: 800.0 }),
            ("M".to_string(), SpeedRange { min: 500.0, max: 1200.0 }),
            ("X".to_string(), SpeedRange { min: 800.0, max: 2000.0 }),
        ]);
        let magnetic_class_descriptions = BTreeMap::from([
            ("A".to_string(), "Alpha: unipolar sunspot group".to_string()),
            ("B".to_string(), "Beta: bipolar group with simple polarity division".to_string()),
            ("BG".to_string(), "Beta-Gamma: bipolar group with mixed polarities".to_string()),
            ("BD".to_string(), "Beta-Delta: bipolar group with umbral opposite-polarity spots".to_string()),
            ("BGD".to_string(), "Beta-Gamma-Delta: complex group, highest eruptive potential".to_string()),
            ("G".to_string(), "Gamma: irregularly distributed polarities".to_string()),
        ]);
        Self {
            cme_association_window_hours: 6.0,
            quick_succession_window_minutes: 60,
            quick_succession_threshold: 3,
            expected_speed_ranges,
            magnetic_class_descriptions,
        }
    }
}

impl AnalysisConfig {
    /// Expected speed range for a flare class letter, if configured.
    pub fn speed_range_for(&self, letter: char) -> Option<SpeedRange> {
        self.expected_speed_ranges
            .get(letter.to_ascii_uppercase().to_string().as_str())
            .copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// Load configuration from the environment: the file named by
    /// `SWX_CONFIG` (or `swx.toml` when present), then env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SWX_CONFIG").unwrap_or_else(|_| "swx.toml".to_string());
        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        if let Ok(key) = std::env::var("DONKI_API_KEY") {
            config.upstream.api_key = key;
        }
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }
}
