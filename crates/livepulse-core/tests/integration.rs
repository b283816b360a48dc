//! Integration tests for livepulse-core.
//!
//! These tests exercise the public API from wall-clock instant to formatted
//! ticker output.

use livepulse_core::{
    compute_metrics, summary, synthesize, Bucket, MetricKey, SeededRng, TickerConfig,
    TickerState, DEFAULT_BUCKET_MS, DEFAULT_NAMESPACE,
};
use proptest::prelude::*;

/// 2100-01-01T00:00:00Z
const LATEST_MS: i64 = 4_102_444_800_000;

fn value_at(now_ms: i64, key: MetricKey) -> f64 {
    let bucket = Bucket::containing(now_ms, DEFAULT_BUCKET_MS).expect("in range");
    synthesize(DEFAULT_NAMESPACE, &bucket)
        .value(key)
        .expect("key present")
}

// =============================================================================
// Golden Snapshots
// =============================================================================

#[test]
fn test_rng_regression_vector() {
    let draws: Vec<f64> = SeededRng::from_seed_str("pivotr|bucket|0").take(4).collect();
    assert_eq!(
        draws,
        vec![
            0.135_525_232_180_953_03,
            0.958_785_021_910_443_9,
            0.378_283_410_333_097,
            0.208_735_295_338_556_17,
        ]
    );
}

#[test]
fn test_golden_compute_metrics() {
    let items = compute_metrics(1_760_000_000_000, DEFAULT_BUCKET_MS).expect("valid bucket");
    let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();
    assert_eq!(
        keys,
        ["deployments", "onprem", "cloud", "invoices", "modules", "latency", "uptime"]
    );
    let values: Vec<f64> = items.iter().map(|i| i.value).collect();
    assert_eq!(values[..6], [63.0, 33.0, 30.0, 12_351.0, 126.0, 171.0]);
    assert!((values[6] - 99.981_605_663_541_7).abs() < 1e-9);
}

#[test]
fn test_compute_metrics_is_deterministic() {
    let a = compute_metrics(1_700_000_000_000, DEFAULT_BUCKET_MS).expect("valid bucket");
    let b = compute_metrics(1_700_000_000_000, DEFAULT_BUCKET_MS).expect("valid bucket");
    assert_eq!(a, b);
}

#[test]
fn test_json_shape() {
    let items = compute_metrics(0, DEFAULT_BUCKET_MS).expect("valid bucket");
    let json = serde_json::to_value(&items).expect("serializable");
    assert_eq!(json[0]["key"], "deployments");
    assert_eq!(json[0]["type"], "int");
    assert!(json[0].get("suffix").is_none());
    assert_eq!(json[5]["suffix"], "ms");
    assert_eq!(json[6]["type"], "float");
    assert_eq!(json[6]["suffix"], "%");
}

// =============================================================================
// Calendar Behavior
// =============================================================================

#[test]
fn test_invoices_reset_at_local_midnight() {
    // Last bucket of 2025-12-31 local vs first bucket of 2026-01-01 local.
    let late = value_at(1_767_205_795_000, MetricKey::Invoices);
    let midnight = value_at(1_767_205_800_000, MetricKey::Invoices);
    assert_eq!(late, 24_709.0);
    assert_eq!(midnight, 0.0);
}

#[test]
fn test_month_change_reseeds_deployments() {
    let december = value_at(1_767_205_795_000, MetricKey::Deployments);
    let january = value_at(1_767_205_800_000, MetricKey::Deployments);
    assert_eq!(december, 53.0);
    assert_eq!(january, 91.0);
}

/// Local midnight starting 2025-10-09 (UTC+5:30).
const OCT_9_LOCAL_MIDNIGHT_MS: i64 = 1_759_948_200_000;

fn invoices_for_key(key_ms: i64) -> f64 {
    let bucket = Bucket::from_start(key_ms, DEFAULT_BUCKET_MS).expect("in range");
    synthesize(DEFAULT_NAMESPACE, &bucket)
        .value(MetricKey::Invoices)
        .expect("key present")
}

#[test]
fn test_invoices_step_at_most_one_across_curve_midpoint() {
    // The progress curve inflects at f = 0.52, i.e. 44_928 s into the day.
    let inflection = OCT_9_LOCAL_MIDNIGHT_MS + 44_928_000;
    for key in [inflection - 1, inflection, inflection + 999] {
        let before = invoices_for_key(key);
        let after = invoices_for_key(key + 1);
        assert!(after >= before);
        assert!(after - before <= 1.0, "{key}: {before} -> {after}");
    }
}

#[test]
fn test_invoices_window_edges_are_quiet() {
    // Window opens at f = 0.17 and closes at f = 0.87.
    let open = OCT_9_LOCAL_MIDNIGHT_MS + 14_688_000;
    let close = OCT_9_LOCAL_MIDNIGHT_MS + 75_168_000;
    assert_eq!(invoices_for_key(open - 1), 0.0);
    assert!(invoices_for_key(open) <= 1.0);
    let full = invoices_for_key(close);
    assert!(full - invoices_for_key(close - 1) <= 1.0);
    assert_eq!(invoices_for_key(close + 3_600_000), full);
}

// =============================================================================
// Ticker Lifecycle
// =============================================================================

#[test]
fn test_ticker_day_in_buckets() {
    let config = TickerConfig {
        bucket_ms: 60_000,
        ..TickerConfig::default()
    };
    let start = 1_760_000_000_000;
    let mut ticker = TickerState::new(start, config).expect("valid config");
    let mut rollovers = 0;
    for minute in 1..=30 {
        if ticker.on_bucket_timer(start + minute * 60_000).expect("in range") {
            rollovers += 1;
        }
        while ticker.on_frame(0.016, 800.0) {}
    }
    assert_eq!(rollovers, 30);
    assert_eq!(ticker.a11y_text(), summary(ticker.items()));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_values_within_bounds(now in 0i64..LATEST_MS) {
        let bucket = Bucket::containing(now, DEFAULT_BUCKET_MS).expect("in range");
        let s = synthesize(DEFAULT_NAMESPACE, &bucket);
        let uptime = s.value(MetricKey::Uptime).expect("uptime");
        let latency = s.value(MetricKey::Latency).expect("latency");
        let invoices = s.value(MetricKey::Invoices).expect("invoices");
        prop_assert!((99.90..=99.995).contains(&uptime));
        prop_assert!((140.0..=240.0).contains(&latency));
        prop_assert!(invoices >= 0.0);
        prop_assert_eq!(invoices, invoices.trunc());
        prop_assert_eq!(
            s.value(MetricKey::Deployments),
            Some(s.value(MetricKey::Onprem).expect("onprem") + s.value(MetricKey::Cloud).expect("cloud"))
        );
    }

    #[test]
    fn prop_month_scoped_values_stable_within_day(now in 0i64..LATEST_MS, later in 0i64..86_400_000) {
        let a = Bucket::containing(now, DEFAULT_BUCKET_MS).expect("in range");
        let b = Bucket::containing(now + later, DEFAULT_BUCKET_MS).expect("in range");
        prop_assume!(a.month_key == b.month_key);
        let sa = synthesize(DEFAULT_NAMESPACE, &a);
        let sb = synthesize(DEFAULT_NAMESPACE, &b);
        for key in [MetricKey::Onprem, MetricKey::Cloud, MetricKey::Modules] {
            prop_assert_eq!(sa.value(key), sb.value(key));
        }
    }

    #[test]
    fn prop_invoices_never_decrease_within_day(now in 0i64..LATEST_MS, later in 0i64..86_400_000) {
        let a = Bucket::containing(now, DEFAULT_BUCKET_MS).expect("in range");
        let b = Bucket::containing(now + later, DEFAULT_BUCKET_MS).expect("in range");
        prop_assume!(a.day_key == b.day_key);
        prop_assert!(value_at(now, MetricKey::Invoices) <= value_at(now + later, MetricKey::Invoices));
    }

    #[test]
    fn prop_adjacent_instants_in_bucket_agree(now in 0i64..LATEST_MS) {
        let a = Bucket::containing(now, DEFAULT_BUCKET_MS).expect("in range");
        prop_assume!(a.contains(now + 1));
        let b = Bucket::containing(now + 1, DEFAULT_BUCKET_MS).expect("in range");
        prop_assert_eq!(
            synthesize(DEFAULT_NAMESPACE, &a),
            synthesize(DEFAULT_NAMESPACE, &b)
        );
    }

    #[test]
    fn prop_invoices_step_at_most_one_across_second(second in 0i64..LATEST_MS / 1_000) {
        let key = second * 1_000;
        let before = Bucket::from_start(key - 1, DEFAULT_BUCKET_MS).expect("in range");
        let after = Bucket::from_start(key, DEFAULT_BUCKET_MS).expect("in range");
        prop_assume!(before.day_key == after.day_key);
        let step = invoices_for_key(key) - invoices_for_key(key - 1);
        prop_assert!((0.0..=1.0).contains(&step), "step {}", step);
    }
}
