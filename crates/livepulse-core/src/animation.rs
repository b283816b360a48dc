//! Display interpolation for ticker values.
//!
//! Targets change once per bucket; displays ease toward them once per frame
//! with an exponential approach that never overshoots, then snap exactly onto
//! the target once within tolerance.

use crate::metrics::{MetricItem, MetricKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// ApproachConfig
// =============================================================================

/// Parameters of the per-frame approach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApproachConfig {
    /// Share of the remaining distance covered each frame, in `(0, 1]`.
    pub factor: f64,
    /// Distance below which the display snaps onto the target.
    pub snap_tolerance: f64,
}

impl Default for ApproachConfig {
    fn default() -> Self {
        Self::TICKER
    }
}

impl ApproachConfig {
    /// Reference ticker tuning.
    pub const TICKER: Self = Self {
        factor: 0.15,
        snap_tolerance: 0.5,
    };

    /// Create a custom config.
    #[must_use]
    pub const fn custom(factor: f64, snap_tolerance: f64) -> Self {
        Self {
            factor,
            snap_tolerance,
        }
    }

    /// Upper bound on frames needed to settle from `distance` away,
    /// counting the final snap frame.
    #[must_use]
    pub fn frames_to_settle(&self, distance: f64) -> u32 {
        let distance = distance.abs();
        if distance < self.snap_tolerance {
            return 1;
        }
        let shrink = 1.0 - self.factor;
        if shrink <= 0.0 {
            return 2;
        }
        let steps = (self.snap_tolerance / distance).ln() / shrink.ln();
        steps.ceil() as u32 + 1
    }
}

// =============================================================================
// AnimatedNumber
// =============================================================================

/// Phase of one displayed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Display equals target.
    #[default]
    Idle,
    /// Display is converging on target.
    Animating,
}

/// A displayed number chasing a discrete target.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedNumber {
    display: f64,
    target: f64,
    phase: Phase,
    config: ApproachConfig,
}

impl AnimatedNumber {
    /// Start idle at `initial`; the first target shows without animation.
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self {
            display: initial,
            target: initial,
            phase: Phase::Idle,
            config: ApproachConfig::default(),
        }
    }

    /// Set the approach config.
    #[must_use]
    pub fn with_config(mut self, config: ApproachConfig) -> Self {
        self.config = config;
        self
    }

    /// Current display value.
    #[must_use]
    pub const fn display(&self) -> f64 {
        self.display
    }

    /// Current target.
    #[must_use]
    pub const fn target(&self) -> f64 {
        self.target
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a frame would still move the display.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.phase == Phase::Animating
    }

    /// Retarget without resetting the display position.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
        self.phase = if self.display == target {
            Phase::Idle
        } else {
            Phase::Animating
        };
    }

    /// Jump straight to `value`.
    pub fn set_immediate(&mut self, value: f64) {
        self.display = value;
        self.target = value;
        self.phase = Phase::Idle;
    }

    /// Advance one frame and return the new display value.
    ///
    /// With `reduced_motion` the display lands on the target in this frame.
    pub fn step(&mut self, reduced_motion: bool) -> f64 {
        if self.phase == Phase::Idle {
            return self.display;
        }
        let delta = self.target - self.display;
        if reduced_motion || delta.abs() < self.config.snap_tolerance {
            self.display = self.target;
            self.phase = Phase::Idle;
        } else {
            self.display += delta * self.config.factor;
        }
        self.display
    }
}

// =============================================================================
// Marquee
// =============================================================================

/// Horizontal scroll position of the doubled ticker track.
#[derive(Debug, Clone, PartialEq)]
pub struct Marquee {
    offset: f64,
    speed: f64,
    paused: bool,
}

impl Default for Marquee {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPEED)
    }
}

impl Marquee {
    /// Reference scroll speed in units (px or columns) per second.
    pub const DEFAULT_SPEED: f64 = 42.0;

    /// Create a marquee scrolling at `speed` units per second.
    #[must_use]
    pub const fn new(speed: f64) -> Self {
        Self {
            offset: 0.0,
            speed,
            paused: false,
        }
    }

    /// Current offset; zero or negative.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Whether scrolling is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause or resume scrolling.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Return to the start of the track.
    pub fn reset(&mut self) {
        self.offset = 0.0;
    }

    /// Advance by `dt` seconds over a doubled track `track_width` wide.
    ///
    /// Wraps to zero once the first copy has scrolled fully out of view.
    pub fn advance(&mut self, dt: f64, track_width: f64) -> f64 {
        if self.paused {
            return self.offset;
        }
        let next = self.offset - self.speed * dt;
        let half = (track_width / 2.0).max(0.5);
        self.offset = if next <= -half { 0.0 } else { next };
        self.offset
    }
}

// =============================================================================
// DisplayBank
// =============================================================================

/// Animated displays for every ticker key.
#[derive(Debug, Clone, Default)]
pub struct DisplayBank {
    numbers: BTreeMap<MetricKey, AnimatedNumber>,
    config: ApproachConfig,
}

impl DisplayBank {
    /// Create an empty bank.
    #[must_use]
    pub fn new(config: ApproachConfig) -> Self {
        Self {
            numbers: BTreeMap::new(),
            config,
        }
    }

    /// Feed a fresh set of targets. Unknown keys start idle at their target.
    pub fn set_targets(&mut self, items: &[MetricItem]) {
        for item in items {
            let config = self.config;
            self.numbers
                .entry(item.key)
                .and_modify(|n| n.set_target(item.value))
                .or_insert_with(|| AnimatedNumber::new(item.value).with_config(config));
        }
    }

    /// Jump every display onto its target.
    pub fn settle(&mut self) {
        for number in self.numbers.values_mut() {
            let target = number.target();
            number.set_immediate(target);
        }
    }

    /// Advance every display one frame.
    pub fn step(&mut self, reduced_motion: bool) {
        for number in self.numbers.values_mut() {
            number.step(reduced_motion);
        }
    }

    /// Current display value for `key`.
    #[must_use]
    pub fn display(&self, key: MetricKey) -> Option<f64> {
        self.numbers.get(&key).map(AnimatedNumber::display)
    }

    /// Animated number for `key`.
    #[must_use]
    pub fn get(&self, key: MetricKey) -> Option<&AnimatedNumber> {
        self.numbers.get(&key)
    }

    /// Whether any display is still converging.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.numbers.values().any(AnimatedNumber::is_animating)
    }

    /// Number of displays still converging.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.numbers.values().filter(|n| n.is_animating()).count()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // -------------------------------------------------------------------------
    // AnimatedNumber
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_is_idle_at_initial() {
        let n = AnimatedNumber::new(42.0);
        assert_eq!(n.display(), 42.0);
        assert_eq!(n.phase(), Phase::Idle);
    }

    #[test]
    fn test_first_step_moves_by_factor() {
        let mut n = AnimatedNumber::new(0.0);
        n.set_target(100.0);
        assert_eq!(n.step(false), 15.0);
        assert!(n.is_animating());
    }

    #[test]
    fn test_settles_from_zero_to_hundred_in_34_frames() {
        let mut n = AnimatedNumber::new(0.0);
        n.set_target(100.0);
        let mut frames = 0;
        while n.is_animating() {
            n.step(false);
            frames += 1;
        }
        assert_eq!(frames, 34);
        assert_eq!(n.display(), 100.0);
        assert!(frames <= ApproachConfig::TICKER.frames_to_settle(100.0));
    }

    #[test]
    fn test_snap_within_tolerance() {
        let mut n = AnimatedNumber::new(10.0);
        n.set_target(10.4);
        assert_eq!(n.step(false), 10.4);
        assert_eq!(n.phase(), Phase::Idle);
    }

    #[test]
    fn test_reduced_motion_jumps_on_first_frame() {
        let mut n = AnimatedNumber::new(0.0);
        n.set_target(12_351.0);
        assert_eq!(n.step(true), 12_351.0);
        assert!(!n.is_animating());
    }

    #[test]
    fn test_retarget_keeps_position() {
        let mut n = AnimatedNumber::new(0.0);
        n.set_target(100.0);
        n.step(false);
        n.step(false);
        let mid = n.display();
        n.set_target(200.0);
        assert_eq!(n.display(), mid);
        assert_eq!(n.target(), 200.0);
        assert!(n.is_animating());
    }

    #[test]
    fn test_retarget_to_display_goes_idle() {
        let mut n = AnimatedNumber::new(5.0);
        n.set_target(5.0);
        assert_eq!(n.phase(), Phase::Idle);
    }

    #[test]
    fn test_idle_step_is_noop() {
        let mut n = AnimatedNumber::new(7.0);
        assert_eq!(n.step(false), 7.0);
    }

    #[test]
    fn test_descending_target() {
        let mut n = AnimatedNumber::new(240.0);
        n.set_target(140.0);
        while n.is_animating() {
            let v = n.step(false);
            assert!(v >= 140.0);
        }
        assert_eq!(n.display(), 140.0);
    }

    #[test]
    fn test_frames_to_settle_small_distance() {
        assert_eq!(ApproachConfig::TICKER.frames_to_settle(0.2), 1);
        assert_eq!(ApproachConfig::custom(1.0, 0.5).frames_to_settle(50.0), 2);
    }

    // -------------------------------------------------------------------------
    // Marquee
    // -------------------------------------------------------------------------

    #[test]
    fn test_marquee_scrolls_left() {
        let mut m = Marquee::default();
        assert!((m.advance(1.0, 1_000.0) + 42.0).abs() < 1e-12);
    }

    #[test]
    fn test_marquee_wraps_at_half_track() {
        let mut m = Marquee::new(100.0);
        m.advance(0.9, 200.0);
        assert!((m.offset() + 90.0).abs() < 1e-12);
        assert_eq!(m.advance(0.2, 200.0), 0.0);
    }

    #[test]
    fn test_marquee_paused_holds() {
        let mut m = Marquee::default();
        m.advance(0.5, 1_000.0);
        let held = m.offset();
        m.set_paused(true);
        assert_eq!(m.advance(10.0, 1_000.0), held);
        assert!(m.is_paused());
        m.reset();
        assert_eq!(m.offset(), 0.0);
    }

    // -------------------------------------------------------------------------
    // DisplayBank
    // -------------------------------------------------------------------------

    #[test]
    fn test_bank_first_targets_are_idle() {
        let mut bank = DisplayBank::new(ApproachConfig::TICKER);
        bank.set_targets(&[MetricItem::new(MetricKey::Invoices, 500.0)]);
        assert_eq!(bank.display(MetricKey::Invoices), Some(500.0));
        assert!(!bank.is_animating());
    }

    #[test]
    fn test_bank_animates_changes() {
        let mut bank = DisplayBank::new(ApproachConfig::TICKER);
        bank.set_targets(&[
            MetricItem::new(MetricKey::Invoices, 500.0),
            MetricItem::new(MetricKey::Cloud, 30.0),
        ]);
        bank.set_targets(&[
            MetricItem::new(MetricKey::Invoices, 600.0),
            MetricItem::new(MetricKey::Cloud, 30.0),
        ]);
        assert_eq!(bank.active_count(), 1);
        bank.step(false);
        assert_eq!(bank.display(MetricKey::Invoices), Some(515.0));
        bank.settle();
        assert_eq!(bank.display(MetricKey::Invoices), Some(600.0));
        assert!(!bank.is_animating());
    }

    #[test]
    fn test_bank_missing_key() {
        let bank = DisplayBank::default();
        assert!(bank.display(MetricKey::Uptime).is_none());
        assert!(bank.get(MetricKey::Uptime).is_none());
    }

    proptest! {
        #[test]
        fn prop_converges_without_overshoot(start in -1.0e6f64..1.0e6, target in -1.0e6f64..1.0e6) {
            let config = ApproachConfig::TICKER;
            let mut n = AnimatedNumber::new(start);
            n.set_target(target);
            let bound = config.frames_to_settle(target - start);
            let mut frames = 0;
            while n.is_animating() {
                let before = (target - n.display()).signum();
                n.step(false);
                let after = target - n.display();
                prop_assert!(after == 0.0 || after.signum() == before);
                frames += 1;
                prop_assert!(frames <= bound + 1);
            }
            prop_assert_eq!(n.display(), target);
        }

        #[test]
        fn prop_reduced_motion_single_frame(start in -1.0e6f64..1.0e6, target in -1.0e6f64..1.0e6) {
            let mut n = AnimatedNumber::new(start);
            n.set_target(target);
            n.step(true);
            prop_assert_eq!(n.display(), target);
            prop_assert!(!n.is_animating());
        }
    }
}
