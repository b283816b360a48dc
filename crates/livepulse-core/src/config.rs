//! Ticker configuration loaded from TOML.

use crate::animation::{ApproachConfig, Marquee};
use crate::clock::DEFAULT_BUCKET_MS;
use crate::error::PulseError;
use crate::metrics::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime configuration for a ticker host.
///
/// Every viewer that should agree on the numbers must share `bucket_ms` and
/// `seed_namespace`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TickerConfig {
    /// Bucket width in milliseconds.
    pub bucket_ms: i64,
    /// Prefix of every seed string.
    pub seed_namespace: String,
    /// Share of the remaining distance covered per frame.
    pub easing_factor: f64,
    /// Distance at which displays snap onto their targets.
    pub snap_tolerance: f64,
    /// Marquee speed in columns (or px) per second.
    pub marquee_speed: f64,
    /// Interval between animation frames in milliseconds.
    pub frame_interval_ms: u64,
    /// Skip interpolation and scrolling.
    pub reduced_motion: bool,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            bucket_ms: DEFAULT_BUCKET_MS,
            seed_namespace: DEFAULT_NAMESPACE.to_string(),
            easing_factor: ApproachConfig::TICKER.factor,
            snap_tolerance: ApproachConfig::TICKER.snap_tolerance,
            marquee_speed: Marquee::DEFAULT_SPEED,
            frame_interval_ms: 16,
            reduced_motion: false,
        }
    }
}

impl TickerConfig {
    /// Default config file name.
    pub const CONFIG_FILE: &'static str = "livepulse.toml";

    /// Parse and validate a TOML document.
    pub fn from_toml(toml_str: &str) -> Result<Self, PulseError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML document.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Load and validate a config file.
    pub fn load_from_file(path: &Path) -> Result<Self, PulseError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load `path` if given, else [`Self::CONFIG_FILE`] if it exists, else
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, PulseError> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        let default_path = Path::new(Self::CONFIG_FILE);
        if default_path.is_file() {
            tracing::debug!(path = %default_path.display(), "loading ticker config");
            Self::load_from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject values that would break scheduling or interpolation.
    pub fn validate(&self) -> Result<(), PulseError> {
        if self.bucket_ms <= 0 {
            return Err(PulseError::InvalidBucketWidth(self.bucket_ms));
        }
        if !(self.easing_factor > 0.0 && self.easing_factor <= 1.0) {
            return Err(PulseError::Config(format!(
                "easing_factor must be in (0, 1], got {}",
                self.easing_factor
            )));
        }
        if !(self.snap_tolerance.is_finite() && self.snap_tolerance > 0.0) {
            return Err(PulseError::Config(format!(
                "snap_tolerance must be positive, got {}",
                self.snap_tolerance
            )));
        }
        if !(self.marquee_speed.is_finite() && self.marquee_speed >= 0.0) {
            return Err(PulseError::Config(format!(
                "marquee_speed must be non-negative, got {}",
                self.marquee_speed
            )));
        }
        if self.frame_interval_ms == 0 {
            return Err(PulseError::Config(
                "frame_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Approach parameters for display interpolation.
    #[must_use]
    pub const fn approach(&self) -> ApproachConfig {
        ApproachConfig::custom(self.easing_factor, self.snap_tolerance)
    }
}
