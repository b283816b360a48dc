//! Time bucketing in a fixed UTC+5:30 calendar.
//!
//! A [`Bucket`] quantizes a wall-clock instant to a fixed-width window and
//! carries the calendar keys derived from it. The local day is pinned to one
//! offset regardless of the host timezone, so servers in different regions
//! agree on which day and month a bucket belongs to.

use crate::error::PulseError;
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bucket width in milliseconds.
pub const DEFAULT_BUCKET_MS: i64 = 5_000;

/// Fixed calendar offset: UTC+5:30 in milliseconds.
pub const UTC_OFFSET_MS: i64 = 19_800_000;

/// Seconds in a calendar day.
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Source of wall-clock milliseconds since the Unix epoch.
pub trait Clock {
    /// Current instant in milliseconds since the epoch.
    fn now_ms(&self) -> i64;
}

/// Wall clock backed by the host system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock pinned to a fixed instant, advanced manually.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedClock {
    now_ms: i64,
}

impl FixedClock {
    /// Create a clock reading `now_ms`.
    #[must_use]
    pub const fn new(now_ms: i64) -> Self {
        Self { now_ms }
    }

    /// Move the clock forward by `ms`.
    pub fn advance(&mut self, ms: i64) {
        self.now_ms += ms;
    }

    /// Set the clock to `now_ms`.
    pub fn set(&mut self, now_ms: i64) {
        self.now_ms = now_ms;
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now_ms
    }
}

/// Start of the bucket containing `now_ms`.
///
/// Uses Euclidean division so instants before the epoch round down.
pub fn bucket_start(now_ms: i64, width_ms: i64) -> Result<i64, PulseError> {
    if width_ms <= 0 {
        return Err(PulseError::InvalidBucketWidth(width_ms));
    }
    now_ms
        .div_euclid(width_ms)
        .checked_mul(width_ms)
        .ok_or(PulseError::TimestampOutOfRange(now_ms))
}

/// Start of the bucket after the one containing `now_ms`.
pub fn next_boundary(now_ms: i64, width_ms: i64) -> Result<i64, PulseError> {
    bucket_start(now_ms, width_ms)?
        .checked_add(width_ms)
        .ok_or(PulseError::TimestampOutOfRange(now_ms))
}

/// Time remaining until the next bucket boundary.
///
/// Always in `(0, width]`: an instant exactly on a boundary waits a full
/// bucket.
pub fn delay_until_next_boundary(now_ms: i64, width_ms: i64) -> Result<Duration, PulseError> {
    let next = next_boundary(now_ms, width_ms)?;
    Ok(Duration::from_millis((next - now_ms) as u64))
}

/// One fixed-width time window and its calendar keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Inclusive start of the window, ms since epoch.
    pub start_ms: i64,
    /// Window width in ms.
    pub width_ms: i64,
    /// Local calendar date, `YYYY-MM-DD`.
    pub day_key: String,
    /// Local calendar month, `YYYY-MM`.
    pub month_key: String,
    /// Elapsed share of the local day at `start_ms`, in `[0, 1)`.
    pub fraction_of_day: f64,
}

impl Bucket {
    /// Bucket containing the instant `now_ms`.
    pub fn containing(now_ms: i64, width_ms: i64) -> Result<Self, PulseError> {
        let start_ms = bucket_start(now_ms, width_ms)?;
        Self::from_start(start_ms, width_ms)
    }

    /// Bucket whose key is exactly `start_ms`.
    ///
    /// `start_ms` is used verbatim as the bucket key even when it is not a
    /// multiple of `width_ms`.
    pub fn from_start(start_ms: i64, width_ms: i64) -> Result<Self, PulseError> {
        if width_ms <= 0 {
            return Err(PulseError::InvalidBucketWidth(width_ms));
        }
        let local = start_ms
            .checked_add(UTC_OFFSET_MS)
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or(PulseError::TimestampOutOfRange(start_ms))?;

        let seconds = f64::from(local.num_seconds_from_midnight());
        Ok(Self {
            start_ms,
            width_ms,
            day_key: format!("{:04}-{:02}-{:02}", local.year(), local.month(), local.day()),
            month_key: format!("{:04}-{:02}", local.year(), local.month()),
            fraction_of_day: seconds / SECONDS_PER_DAY,
        })
    }

    /// Bucket for the current reading of `clock`.
    pub fn now<C: Clock + ?Sized>(clock: &C, width_ms: i64) -> Result<Self, PulseError> {
        Self::containing(clock.now_ms(), width_ms)
    }

    /// Exclusive end of the window, saturating at `i64::MAX`.
    #[must_use]
    pub const fn end_ms(&self) -> i64 {
        self.start_ms.saturating_add(self.width_ms)
    }

    /// Whether `now_ms` falls inside this window.
    #[must_use]
    pub const fn contains(&self, now_ms: i64) -> bool {
        now_ms >= self.start_ms && now_ms < self.end_ms()
    }

    /// The following bucket.
    pub fn next(&self) -> Result<Self, PulseError> {
        Self::from_start(self.end_ms(), self.width_ms)
    }
}
