//! Display formatting and the screen-reader summary.

use crate::metrics::{MetricItem, MetricKey, MetricKind};

/// Shown in place of a value that is missing or not finite.
pub const MISSING: &str = "\u{2014}";

/// Summary announced before the first client frame.
pub const PLACEHOLDER_SUMMARY: &str = "Status: live metrics updating.";

/// Insert `,` every three digits of an unsigned digit string.
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a decimal string (optionally signed, optionally with a fraction)
/// with thousands separators on its integer part.
fn group_decimal(text: &str) -> String {
    let (sign, unsigned) = text
        .strip_prefix('-')
        .map_or(("", text), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));
    let mut out = String::from(sign);
    out.push_str(&group_digits(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Rounded, comma-grouped integer: `12351.4` -> `12,351`.
#[must_use]
pub fn format_int(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let rounded = value.round();
    // Avoid "-0" for values that round to zero from below.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    group_decimal(&format!("{rounded:.0}"))
}

/// Two-decimal, comma-grouped number: `1234.5` -> `1,234.50`.
#[must_use]
pub fn format_fixed2(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    group_decimal(&format!("{value:.2}"))
}

/// Format `value` according to `kind`.
#[must_use]
pub fn format_value(value: f64, kind: MetricKind) -> String {
    match kind {
        MetricKind::Int => format_int(value),
        MetricKind::Float => format_fixed2(value),
    }
}

/// Format an item's value followed by its suffix, if any.
#[must_use]
pub fn format_item(item: &MetricItem, display: f64) -> String {
    let value = format_value(display, item.kind);
    match &item.suffix {
        Some(suffix) => format!("{value} {suffix}"),
        None => value,
    }
}

fn lookup(items: &[MetricItem], key: MetricKey) -> Option<f64> {
    items.iter().find(|item| item.key == key).map(|item| item.value)
}

fn int_or_missing(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), format_int)
}

/// One-sentence description of the ticker for assistive technology.
#[must_use]
pub fn summary(items: &[MetricItem]) -> String {
    let uptime = lookup(items, MetricKey::Uptime)
        .filter(|v| v.is_finite())
        .map_or_else(|| MISSING.to_string(), |v| format!("{v:.2}"));
    let deployments = int_or_missing(lookup(items, MetricKey::Deployments));
    let onprem = int_or_missing(lookup(items, MetricKey::Onprem));
    let cloud = int_or_missing(lookup(items, MetricKey::Cloud));
    let invoices = int_or_missing(lookup(items, MetricKey::Invoices));
    let latency = int_or_missing(lookup(items, MetricKey::Latency));

    format!(
        "Status: {deployments} active deployments with {onprem} on\u{2011}prem and {cloud} cloud, \
         {invoices} invoices processed today, average response {latency} milliseconds, \
         SLA uptime {uptime} percent."
    )
}
