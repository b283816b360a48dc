//! Error types for livepulse-core.

use thiserror::Error;

/// Errors raised while preparing inputs for synthesis.
///
/// Synthesis itself is total; every failure happens before a [`crate::Bucket`]
/// exists.
#[derive(Debug, Error)]
pub enum PulseError {
    /// Bucket width must be a positive number of milliseconds.
    #[error("invalid bucket width: {0}ms (must be > 0)")]
    InvalidBucketWidth(i64),

    /// Instant cannot be mapped onto the calendar.
    #[error("timestamp out of range: {0}ms")]
    TimestampOutOfRange(i64),

    /// Configuration could not be parsed or failed validation.
    #[error("config error: {0}")]
    Config(String),

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for PulseError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
