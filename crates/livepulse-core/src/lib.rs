//! Deterministic live-metrics synthesis for the livepulse ticker.
//!
//! Every viewer that shares a bucket width and seed namespace computes the
//! same numbers for the same instant:
//! - Seeded generator: [`SeededRng`], a string-keyed stream of floats in `[0, 1)`
//! - Time bucketing: [`Bucket`] in a fixed UTC+5:30 calendar
//! - Synthesis: [`synthesize`] and [`compute_metrics`] from bucket to [`MetricItem`]s
//! - Animation: [`AnimatedNumber`], [`DisplayBank`] and [`Marquee`]
//! - Hosting: [`TickerState`] and the native [`BucketTimer`]

pub mod animation;
pub mod clock;
mod config;
mod error;
pub mod format;
pub mod metrics;
pub mod rng;
pub mod schedule;
pub mod ticker;

pub use animation::{AnimatedNumber, ApproachConfig, DisplayBank, Marquee, Phase};
pub use clock::{
    bucket_start, delay_until_next_boundary, next_boundary, Bucket, Clock, FixedClock,
    SystemClock, DEFAULT_BUCKET_MS, UTC_OFFSET_MS,
};
pub use config::TickerConfig;
pub use error::PulseError;
pub use format::{format_item, format_value, summary, MISSING, PLACEHOLDER_SUMMARY};
pub use metrics::{
    compute_metrics, synthesize, MetricItem, MetricKey, MetricKind, SeedKeys, Snapshot,
    DEFAULT_NAMESPACE,
};
pub use rng::{SeedHasher, SeededRng};
pub use schedule::{BucketTimer, TimerHandle};
pub use ticker::{DisplayItem, TickerState};

/// Result alias for livepulse-core operations.
pub type Result<T> = std::result::Result<T, PulseError>;
