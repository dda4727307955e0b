//! Runtime configuration passed into each component at construction.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::UNKNOWN_BAND;

/// Configuration load or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// Config file is not valid JSON for [`AppConfig`].
    #[error("failed to decode config: {0}")]
    Json(#[from] serde_json::Error),
    /// Values decoded but are unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Operator identity and session clustering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// The operator's own call-sign.
    pub operator_call: String,
    /// The operator's grid square, used to dim self-announcements in detail views.
    pub grid: String,
    /// Largest gap between consecutive messages of one session, in seconds.
    pub session_gap_secs: i64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            operator_call: "N1ZZT".to_string(),
            grid: "FN31".to_string(),
            session_gap_secs: 60,
        }
    }
}

/// One inclusive frequency range mapped to a band label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandRange {
    /// Lower edge in MHz.
    pub low_mhz: f64,
    /// Upper edge in MHz.
    pub high_mhz: f64,
    /// Band label, e.g. `20m`.
    pub label: String,
}

impl BandRange {
    fn new(low_mhz: f64, high_mhz: f64, label: &str) -> Self {
        Self {
            low_mhz,
            high_mhz,
            label: label.to_string(),
        }
    }
}

/// Ordered frequency-to-band table. The first matching range wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPlan {
    /// Ranges in lookup order.
    pub ranges: Vec<BandRange>,
}

impl Default for BandPlan {
    fn default() -> Self {
        Self {
            ranges: vec![
                BandRange::new(1.800, 2.000, "160m"),
                BandRange::new(3.500, 4.000, "80m"),
                BandRange::new(5.250, 5.500, "60m"),
                BandRange::new(7.000, 7.300, "40m"),
                BandRange::new(10.100, 10.150, "30m"),
                BandRange::new(14.000, 14.350, "20m"),
                BandRange::new(18.068, 18.168, "17m"),
                BandRange::new(21.000, 21.450, "15m"),
                BandRange::new(24.890, 24.990, "12m"),
                BandRange::new(28.000, 29.700, "10m"),
                BandRange::new(50.000, 54.000, "6m"),
                BandRange::new(144.000, 148.000, "2m"),
            ],
        }
    }
}

impl BandPlan {
    /// Maps a frequency to its band label, or [`UNKNOWN_BAND`].
    ///
    /// Total over all `f64` values: NaN and out-of-range inputs are unknown.
    pub fn band_for(&self, freq_mhz: f64) -> &str {
        self.ranges
            .iter()
            .find(|r| r.low_mhz <= freq_mhz && freq_mhz <= r.high_mhz)
            .map(|r| r.label.as_str())
            .unwrap_or(UNKNOWN_BAND)
    }
}

/// Line parser settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Protocol-mode tag a line must carry to be accepted.
    pub mode_tag: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            mode_tag: "FT8".to_string(),
        }
    }
}

/// Ingestion batching and progress settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Records buffered before a store flush.
    pub batch_size: usize,
    /// Minimum wall-clock interval between progress events, in milliseconds.
    pub progress_interval_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: 500,
            progress_interval_ms: 1000,
        }
    }
}

impl IngestConfig {
    /// Progress interval as a [`Duration`].
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

/// Whole-application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Operator settings.
    pub station: StationConfig,
    /// Frequency-to-band table.
    pub bands: BandPlan,
    /// Line parser settings.
    pub parser: ParserConfig,
    /// Ingestion settings.
    pub ingest: IngestConfig,
}

impl AppConfig {
    /// Reads and validates a JSON config file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path)?;
        let cfg: Self = serde_json::from_slice(&bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects values no component can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.station.operator_call.trim().is_empty() {
            return Err(ConfigError::Invalid("operator_call is empty".to_string()));
        }
        if self.station.session_gap_secs < 0 {
            return Err(ConfigError::Invalid(format!(
                "session_gap_secs must not be negative, got {}",
                self.station.session_gap_secs
            )));
        }
        if self.ingest.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".to_string()));
        }
        if self.parser.mode_tag.trim().is_empty() {
            return Err(ConfigError::Invalid("mode_tag is empty".to_string()));
        }
        if let Some(r) = self.bands.ranges.iter().find(|r| r.low_mhz > r.high_mhz) {
            return Err(ConfigError::Invalid(format!(
                "band {} has low edge above high edge",
                r.label
            )));
        }
        Ok(())
    }
}
