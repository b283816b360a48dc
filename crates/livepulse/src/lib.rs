//! livepulse: deterministic live metrics for server and browser renders.
//!
//! Re-exports [`livepulse_core`] and adds JSON entry points shared by the
//! HTTP server and the WASM binding.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { LiveTicker, nextBoundaryDelay, prefersReducedMotion } from './livepulse.js';
//!
//! await init();
//! const ticker = new LiveTicker(Date.now(), prefersReducedMotion());
//! const onBucket = () => {
//!     ticker.onBucketTimer(Date.now());
//!     setTimeout(onBucket, nextBoundaryDelay(Date.now()));
//! };
//! setTimeout(onBucket, nextBoundaryDelay(Date.now()));
//! ```

pub mod browser;

pub use livepulse_core::*;

/// Ticker items for the bucket keyed `bucket_ms` as a JSON array.
pub fn metrics_json(bucket_ms: i64, width_ms: i64) -> std::result::Result<String, PulseError> {
    let items = compute_metrics(bucket_ms, width_ms)?;
    Ok(serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string()))
}

/// Full snapshot for the bucket containing `now_ms` as a JSON object.
pub fn snapshot_json(now_ms: i64, config: &TickerConfig) -> std::result::Result<String, PulseError> {
    let bucket = Bucket::containing(now_ms, config.bucket_ms)?;
    let snapshot = synthesize(&config.seed_namespace, &bucket);
    Ok(serde_json::to_string(&snapshot).unwrap_or_else(|_| "{}".to_string()))
}
