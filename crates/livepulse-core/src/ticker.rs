//! Host-independent ticker state machine.
//!
//! A host owns two timers: one firing at each bucket boundary
//! ([`TickerState::on_bucket_timer`]) and one per animation frame
//! ([`TickerState::on_frame`]). Everything else is derived here.

use crate::animation::{DisplayBank, Marquee};
use crate::clock::{delay_until_next_boundary, Bucket};
use crate::config::TickerConfig;
use crate::error::PulseError;
use crate::format::{format_item, summary, PLACEHOLDER_SUMMARY};
use crate::metrics::{synthesize, MetricItem, MetricKey, Snapshot};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One pill as a host should draw it this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayItem {
    /// Metric identifier.
    pub key: MetricKey,
    /// Caption.
    pub label: String,
    /// Interpolated value.
    pub display: f64,
    /// Value the display is converging on.
    pub target: f64,
    /// Formatted display value with suffix.
    pub text: String,
}

/// Live ticker: current bucket, its targets, the eased displays and the
/// marquee position.
#[derive(Debug, Clone)]
pub struct TickerState {
    config: TickerConfig,
    bucket: Bucket,
    snapshot: Snapshot,
    displays: DisplayBank,
    marquee: Marquee,
    reduced_motion: bool,
    mounted: bool,
}

impl TickerState {
    /// Build the ticker for the bucket containing `now_ms`.
    ///
    /// Displays start on their targets, so the first frame shows no motion.
    pub fn new(now_ms: i64, config: TickerConfig) -> Result<Self, PulseError> {
        config.validate()?;
        let bucket = Bucket::containing(now_ms, config.bucket_ms)?;
        let snapshot = synthesize(&config.seed_namespace, &bucket);
        let mut displays = DisplayBank::new(config.approach());
        displays.set_targets(&snapshot.items);
        Ok(Self {
            marquee: Marquee::new(config.marquee_speed),
            reduced_motion: config.reduced_motion,
            config,
            bucket,
            snapshot,
            displays,
            mounted: false,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &TickerConfig {
        &self.config
    }

    /// Current bucket.
    #[must_use]
    pub const fn bucket(&self) -> &Bucket {
        &self.bucket
    }

    /// Targets for the current bucket.
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Target items for the current bucket.
    #[must_use]
    pub fn items(&self) -> &[MetricItem] {
        &self.snapshot.items
    }

    /// Marquee state.
    #[must_use]
    pub const fn marquee(&self) -> &Marquee {
        &self.marquee
    }

    /// Whether motion is suppressed.
    #[must_use]
    pub const fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Whether the first client frame has run.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether any display is still converging.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.displays.is_animating()
    }

    /// Recompute targets if `now_ms` has left the current bucket.
    ///
    /// Returns `true` when the bucket rolled over.
    pub fn on_bucket_timer(&mut self, now_ms: i64) -> Result<bool, PulseError> {
        let bucket = Bucket::containing(now_ms, self.config.bucket_ms)?;
        if bucket.start_ms == self.bucket.start_ms {
            return Ok(false);
        }
        let snapshot = synthesize(&self.config.seed_namespace, &bucket);
        tracing::debug!(
            from = self.bucket.start_ms,
            to = bucket.start_ms,
            day = %bucket.day_key,
            "bucket rollover"
        );
        self.displays.set_targets(&snapshot.items);
        if self.reduced_motion {
            self.displays.settle();
        }
        self.bucket = bucket;
        self.snapshot = snapshot;
        Ok(true)
    }

    /// Advance displays one frame and the marquee by `dt_secs`.
    ///
    /// `track_width` is the width of the doubled pill track in the host's
    /// units. Returns whether any display is still moving.
    pub fn on_frame(&mut self, dt_secs: f64, track_width: f64) -> bool {
        self.mounted = true;
        self.displays.step(self.reduced_motion);
        if !self.reduced_motion {
            self.marquee.advance(dt_secs.max(0.0), track_width);
        }
        self.displays.is_animating()
    }

    /// Time from `now_ms` until the next bucket boundary.
    pub fn next_boundary_delay(&self, now_ms: i64) -> Result<Duration, PulseError> {
        delay_until_next_boundary(now_ms, self.config.bucket_ms)
    }

    /// Toggle reduced motion. Enabling it lands displays on their targets
    /// and parks the marquee.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
        if reduced {
            self.displays.settle();
            self.marquee.reset();
        }
    }

    /// Freeze or resume the marquee (hover, `p` key).
    pub fn set_paused(&mut self, paused: bool) {
        self.marquee.set_paused(paused);
    }

    /// Mark the first client frame as rendered.
    pub fn mark_mounted(&mut self) {
        self.mounted = true;
    }

    /// Screen-reader text for the current targets.
    #[must_use]
    pub fn a11y_text(&self) -> String {
        if self.mounted {
            summary(&self.snapshot.items)
        } else {
            PLACEHOLDER_SUMMARY.to_string()
        }
    }

    /// Pills in display order with their interpolated values.
    #[must_use]
    pub fn display_items(&self) -> Vec<DisplayItem> {
        self.snapshot
            .items
            .iter()
            .map(|item| {
                let display = self.displays.display(item.key).unwrap_or(item.value);
                DisplayItem {
                    key: item.key,
                    label: item.label.clone(),
                    display,
                    target: item.value,
                    text: format_item(item, display),
                }
            })
            .collect()
    }
}
