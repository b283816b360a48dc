//! Deterministic metric synthesis.
//!
//! Three seeded streams, one per calendar scope, feed the ticker:
//!
//! | scope  | seed string                 | drives                                   |
//! |--------|-----------------------------|------------------------------------------|
//! | month  | `<ns>\|month\|YYYY-MM`      | on-prem, cloud, modules multiplier       |
//! | day    | `<ns>\|day\|YYYY-MM-DD`     | SLA baseline, user band, invoice ceiling |
//! | bucket | `<ns>\|bucket\|<start_ms>`  | uptime, users and latency jitter         |
//!
//! The order in which each stream is drawn is part of the output contract:
//! reordering draws changes every downstream value.

use crate::clock::Bucket;
use crate::error::PulseError;
use crate::rng::SeededRng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;

/// Default seed namespace.
pub const DEFAULT_NAMESPACE: &str = "pivotr";

/// Tuning constants for synthesis.
///
/// Values are carried over from the reference ticker and have no documented
/// business meaning; treat them as configuration, not as derived quantities.
pub mod profile {
    /// On-prem instance count: `BASE + floor(r * SPAN)`.
    pub const ONPREM_BASE: u32 = 30;
    /// On-prem span.
    pub const ONPREM_SPAN: u32 = 40;
    /// Cloud instance count base.
    pub const CLOUD_BASE: u32 = 15;
    /// Cloud span.
    pub const CLOUD_SPAN: u32 = 30;
    /// Modules-per-deployment multiplier base.
    pub const MODULES_MULT_BASE: u32 = 2;
    /// Modules multiplier span (multiplier lands in 2..=7).
    pub const MODULES_MULT_SPAN: u32 = 6;

    /// Daily SLA baseline lower edge.
    pub const SLA_DAILY_BASE: f64 = 99.93;
    /// Daily SLA baseline span.
    pub const SLA_DAILY_SPAN: f64 = 0.06;
    /// Peak-to-peak bucket jitter on uptime.
    pub const SLA_JITTER: f64 = 0.01;
    /// Hard uptime floor.
    pub const SLA_FLOOR: f64 = 99.90;
    /// Hard uptime ceiling.
    pub const SLA_CEILING: f64 = 99.995;

    /// Workday band start, as a fraction of the day.
    pub const WORKDAY_START: f64 = 0.25;
    /// Workday band length.
    pub const WORKDAY_LENGTH: f64 = 0.5;
    /// Peak concurrent users base and span.
    pub const USERS_MAX_BASE: u32 = 2_200;
    /// Peak users span.
    pub const USERS_MAX_SPAN: u32 = 800;
    /// Off-hours users base.
    pub const USERS_MIN_BASE: u32 = 200;
    /// Off-hours users span.
    pub const USERS_MIN_SPAN: u32 = 200;
    /// Peak-to-peak bucket jitter on users.
    pub const USERS_JITTER: f64 = 40.0;

    /// Daily invoice ceiling base.
    pub const INVOICES_BASE: u32 = 18_000;
    /// Daily invoice ceiling span.
    pub const INVOICES_SPAN: u32 = 12_000;
    /// Invoice progress window start (17% of the day).
    pub const INVOICE_WINDOW_START: f64 = 0.17;
    /// Invoice progress window length (ends at 87% of the day).
    pub const INVOICE_WINDOW_LENGTH: f64 = 0.7;
    /// Tolerance added before flooring invoice counts.
    pub const FLOOR_EPSILON: f64 = 1e-9;

    /// Latency midline in ms.
    pub const LATENCY_BASE: f64 = 170.0;
    /// Latency daily swing amplitude in ms.
    pub const LATENCY_SWING: f64 = 15.0;
    /// Peak-to-peak bucket jitter on latency.
    pub const LATENCY_JITTER: f64 = 20.0;
    /// Latency floor in ms.
    pub const LATENCY_FLOOR: f64 = 140.0;
    /// Latency ceiling in ms.
    pub const LATENCY_CEILING: f64 = 240.0;
}

/// Identifier of a ticker statistic. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKey {
    /// Active deployments (on-prem + cloud).
    Deployments,
    /// On-prem instances.
    Onprem,
    /// Cloud instances.
    Cloud,
    /// Invoices processed today.
    Invoices,
    /// Modules enabled across deployments.
    Modules,
    /// Average response time.
    Latency,
    /// SLA uptime percentage.
    Uptime,
}

impl MetricKey {
    /// All keys in display order.
    pub const ALL: [Self; 7] = [
        Self::Deployments,
        Self::Onprem,
        Self::Cloud,
        Self::Invoices,
        Self::Modules,
        Self::Latency,
        Self::Uptime,
    ];

    /// Wire identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deployments => "deployments",
            Self::Onprem => "onprem",
            Self::Cloud => "cloud",
            Self::Invoices => "invoices",
            Self::Modules => "modules",
            Self::Latency => "latency",
            Self::Uptime => "uptime",
        }
    }

    /// Caption shown next to the value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Deployments => "Active Deployments",
            Self::Onprem => "On\u{2011}prem Instances",
            Self::Cloud => "Cloud Instances",
            Self::Invoices => "Invoices Processed (Today)",
            Self::Modules => "Modules Enabled",
            Self::Latency => "Avg Response (India)",
            Self::Uptime => "SLA Uptime (90d)",
        }
    }

    /// Display rounding class.
    #[must_use]
    pub const fn kind(self) -> MetricKind {
        match self {
            Self::Uptime => MetricKind::Float,
            _ => MetricKind::Int,
        }
    }

    /// Unit suffix, if any.
    #[must_use]
    pub const fn suffix(self) -> Option<&'static str> {
        match self {
            Self::Latency => Some("ms"),
            Self::Uptime => Some("%"),
            _ => None,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a value is rounded for display. Storage is always `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Rounded to a whole number.
    Int,
    /// Two decimal places.
    Float,
}

/// One synthesized statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricItem {
    /// Identifier.
    pub key: MetricKey,
    /// Caption.
    pub label: String,
    /// Value.
    pub value: f64,
    /// Rounding class.
    #[serde(rename = "type")]
    pub kind: MetricKind,
    /// Unit suffix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl MetricItem {
    /// Build an item with the caption, kind and suffix registered for `key`.
    #[must_use]
    pub fn new(key: MetricKey, value: f64) -> Self {
        Self {
            key,
            label: key.label().to_string(),
            value,
            kind: key.kind(),
            suffix: key.suffix().map(str::to_string),
        }
    }
}

/// Seed strings for the three scopes of one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedKeys {
    /// Bucket-scope seed.
    pub bucket: String,
    /// Day-scope seed.
    pub day: String,
    /// Month-scope seed.
    pub month: String,
}

impl SeedKeys {
    /// Derive the seeds for `bucket` under `namespace`.
    #[must_use]
    pub fn derive(namespace: &str, bucket: &Bucket) -> Self {
        Self {
            bucket: format!("{namespace}|bucket|{}", bucket.start_ms),
            day: format!("{namespace}|day|{}", bucket.day_key),
            month: format!("{namespace}|month|{}", bucket.month_key),
        }
    }
}

/// Full synthesis result for one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Bucket key.
    pub bucket_ms: i64,
    /// Local day key.
    pub day_key: String,
    /// Local month key.
    pub month_key: String,
    /// Ticker items in display order.
    pub items: Vec<MetricItem>,
    /// Concurrent users for the bucket (not shown on the ticker).
    pub concurrent_users: f64,
}

impl Snapshot {
    /// Look up an item by key.
    #[must_use]
    pub fn get(&self, key: MetricKey) -> Option<&MetricItem> {
        self.items.iter().find(|item| item.key == key)
    }

    /// Value of `key`, if present.
    #[must_use]
    pub fn value(&self, key: MetricKey) -> Option<f64> {
        self.get(key).map(|item| item.value)
    }
}

/// Cosine ease-in-ease-out over `[0, 1]`, clamping the input.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn ease_in_out_sine(t: f64) -> f64 {
    0.5 - 0.5 * (PI * t.clamp(0.0, 1.0)).cos()
}

/// Invoice progress through the day: zero before the window, one after it.
#[must_use]
pub fn invoice_progress(fraction_of_day: f64) -> f64 {
    ease_in_out_sine(
        (fraction_of_day - profile::INVOICE_WINDOW_START) / profile::INVOICE_WINDOW_LENGTH,
    )
}

/// Floor with a small tolerance so values a hair below an integer do not
/// drop a whole unit on hosts with different rounding.
#[must_use]
pub fn tolerant_floor(value: f64) -> f64 {
    (value + profile::FLOOR_EPSILON).floor()
}

/// Synthesize every statistic for `bucket`. Pure and total.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn synthesize(namespace: &str, bucket: &Bucket) -> Snapshot {
    use profile::*;

    let seeds = SeedKeys::derive(namespace, bucket);
    let mut rng_bucket = SeededRng::from_seed_str(&seeds.bucket);
    let mut rng_day = SeededRng::from_seed_str(&seeds.day);
    let mut rng_month = SeededRng::from_seed_str(&seeds.month);

    let onprem = rng_month.next_offset(ONPREM_BASE, ONPREM_SPAN);
    let cloud = rng_month.next_offset(CLOUD_BASE, CLOUD_SPAN);
    let deployments = onprem + cloud;
    let modules = deployments * rng_month.next_offset(MODULES_MULT_BASE, MODULES_MULT_SPAN);

    let sla_daily = rng_day.next_scaled(SLA_DAILY_BASE, SLA_DAILY_SPAN);
    let uptime = (sla_daily + rng_bucket.next_jitter(SLA_JITTER)).clamp(SLA_FLOOR, SLA_CEILING);

    let f = bucket.fraction_of_day;
    let workday = ease_in_out_sine((f - WORKDAY_START) / WORKDAY_LENGTH);
    let users_max = f64::from(rng_day.next_offset(USERS_MAX_BASE, USERS_MAX_SPAN));
    let users_min = f64::from(rng_day.next_offset(USERS_MIN_BASE, USERS_MIN_SPAN));
    let concurrent_users =
        (users_min + (users_max - users_min) * workday + rng_bucket.next_jitter(USERS_JITTER))
            .round();

    let ceiling = f64::from(rng_day.next_offset(INVOICES_BASE, INVOICES_SPAN));
    let invoices = tolerant_floor(ceiling * invoice_progress(f)).max(0.0);

    let latency_base = LATENCY_BASE + (TAU * f).sin() * LATENCY_SWING;
    let latency = (latency_base + rng_bucket.next_jitter(LATENCY_JITTER))
        .clamp(LATENCY_FLOOR, LATENCY_CEILING)
        .round();

    let items = vec![
        MetricItem::new(MetricKey::Deployments, f64::from(deployments)),
        MetricItem::new(MetricKey::Onprem, f64::from(onprem)),
        MetricItem::new(MetricKey::Cloud, f64::from(cloud)),
        MetricItem::new(MetricKey::Invoices, invoices),
        MetricItem::new(MetricKey::Modules, f64::from(modules)),
        MetricItem::new(MetricKey::Latency, latency),
        MetricItem::new(MetricKey::Uptime, uptime),
    ];

    Snapshot {
        bucket_ms: bucket.start_ms,
        day_key: bucket.day_key.clone(),
        month_key: bucket.month_key.clone(),
        items,
        concurrent_users,
    }
}

/// Ticker items for the bucket keyed `bucket_ms`, default namespace.
pub fn compute_metrics(bucket_ms: i64, width_ms: i64) -> Result<Vec<MetricItem>, PulseError> {
    let bucket = Bucket::from_start(bucket_ms, width_ms)?;
    Ok(synthesize(DEFAULT_NAMESPACE, &bucket).items)
}
