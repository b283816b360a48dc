//! Host-neutral half of the browser binding.
//!
//! JavaScript passes times as `f64` milliseconds; everything here is plain
//! Rust so it can be tested off the browser.

use livepulse_core::{PulseError, TickerConfig, TickerState};

/// Largest instant a JavaScript `Date` can hold, in ms.
const JS_DATE_LIMIT_MS: f64 = 8.64e15;

/// Convert a JavaScript millisecond count to an integer instant.
///
/// Fractions are floored, matching `Math.floor` bucketing.
pub fn millis_from_js(value: f64) -> Result<i64, PulseError> {
    if !value.is_finite() || value.abs() > JS_DATE_LIMIT_MS {
        return Err(PulseError::TimestampOutOfRange(value as i64));
    }
    Ok(value.floor() as i64)
}

/// Reduced-motion flag from a `prefers-reduced-motion` query result.
///
/// `None` means the query could not be evaluated; the ticker then takes the
/// static path.
#[must_use]
pub fn resolve_reduced_motion(query: Option<bool>) -> bool {
    query.unwrap_or(true)
}

/// Ticker driven by JavaScript timers.
#[derive(Debug, Clone)]
pub struct TickerBridge {
    state: TickerState,
    last_frame_ms: Option<f64>,
}

impl TickerBridge {
    /// Ticker for the bucket containing `now_ms`.
    pub fn new(now_ms: f64, config: TickerConfig) -> Result<Self, PulseError> {
        let state = TickerState::new(millis_from_js(now_ms)?, config)?;
        Ok(Self {
            state,
            last_frame_ms: None,
        })
    }

    /// Underlying state.
    #[must_use]
    pub const fn state(&self) -> &TickerState {
        &self.state
    }

    /// Bucket timer callback; returns whether the targets changed.
    pub fn on_bucket_timer(&mut self, now_ms: f64) -> Result<bool, PulseError> {
        self.state.on_bucket_timer(millis_from_js(now_ms)?)
    }

    /// Milliseconds until the host should call [`Self::on_bucket_timer`].
    pub fn next_boundary_delay(&self, now_ms: f64) -> Result<f64, PulseError> {
        let delay = self.state.next_boundary_delay(millis_from_js(now_ms)?)?;
        Ok(delay.as_millis() as f64)
    }

    /// Animation frame callback with the `requestAnimationFrame` timestamp.
    ///
    /// The first frame only records the timestamp and mounts the ticker.
    pub fn on_frame(&mut self, timestamp_ms: f64, track_width: f64) -> bool {
        let dt = self
            .last_frame_ms
            .map_or(0.0, |last| ((timestamp_ms - last) / 1000.0).max(0.0));
        self.last_frame_ms = Some(timestamp_ms);
        self.state.on_frame(dt, track_width)
    }

    /// Switch motion on or off.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.state.set_reduced_motion(reduced);
    }

    /// Freeze or resume the marquee.
    pub fn set_paused(&mut self, paused: bool) {
        self.state.set_paused(paused);
    }

    /// Current marquee offset in px.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.state.marquee().offset()
    }

    /// Current pills as a JSON array.
    #[must_use]
    pub fn display_json(&self) -> String {
        serde_json::to_string(&self.state.display_items()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Screen-reader text.
    #[must_use]
    pub fn a11y_text(&self) -> String {
        self.state.a11y_text()
    }
}
