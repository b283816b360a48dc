//! WASM exports for browser hosts.

use super::bridge::{millis_from_js, resolve_reduced_motion, TickerBridge};
use livepulse_core::{bucket_start, delay_until_next_boundary, PulseError, TickerConfig};
use wasm_bindgen::prelude::*;

fn to_js(e: PulseError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Install the panic hook once the module loads.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Ticker items for the bucket keyed `bucketMs` (5 s buckets) as JSON.
#[wasm_bindgen(js_name = computeMetrics)]
pub fn compute_metrics(bucket_ms: f64) -> Result<String, JsValue> {
    let bucket_ms = millis_from_js(bucket_ms).map_err(to_js)?;
    crate::metrics_json(bucket_ms, TickerConfig::default().bucket_ms).map_err(to_js)
}

/// Start of the default-width bucket containing `nowMs`.
#[wasm_bindgen(js_name = bucketStart)]
pub fn bucket_start_js(now_ms: f64) -> Result<f64, JsValue> {
    let now_ms = millis_from_js(now_ms).map_err(to_js)?;
    let start = bucket_start(now_ms, TickerConfig::default().bucket_ms).map_err(to_js)?;
    Ok(start as f64)
}

/// Milliseconds from `nowMs` to the next default-width bucket boundary.
#[wasm_bindgen(js_name = nextBoundaryDelay)]
pub fn next_boundary_delay(now_ms: f64) -> Result<f64, JsValue> {
    let now_ms = millis_from_js(now_ms).map_err(to_js)?;
    let delay =
        delay_until_next_boundary(now_ms, TickerConfig::default().bucket_ms).map_err(to_js)?;
    Ok(delay.as_millis() as f64)
}

/// Whether the ticker should skip animation. `true` when the media query
/// is unavailable.
#[wasm_bindgen(js_name = prefersReducedMotion)]
pub fn prefers_reduced_motion() -> bool {
    let query = web_sys::window()
        .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
        .map(|mq| mq.matches());
    resolve_reduced_motion(query)
}

/// Live ticker for one page.
#[wasm_bindgen]
pub struct LiveTicker {
    inner: TickerBridge,
}

#[wasm_bindgen]
impl LiveTicker {
    /// Create a ticker for the bucket containing `nowMs`.
    #[wasm_bindgen(constructor)]
    pub fn new(now_ms: f64, reduced_motion: bool) -> Result<LiveTicker, JsValue> {
        let config = TickerConfig {
            reduced_motion,
            ..TickerConfig::default()
        };
        let inner = TickerBridge::new(now_ms, config).map_err(to_js)?;
        Ok(Self { inner })
    }

    /// Bucket timer callback; returns whether targets changed.
    #[wasm_bindgen(js_name = onBucketTimer)]
    pub fn on_bucket_timer(&mut self, now_ms: f64) -> Result<bool, JsValue> {
        self.inner.on_bucket_timer(now_ms).map_err(to_js)
    }

    /// Delay until the next bucket timer should fire.
    #[wasm_bindgen(js_name = nextBoundaryDelay)]
    pub fn next_boundary_delay(&self, now_ms: f64) -> Result<f64, JsValue> {
        self.inner.next_boundary_delay(now_ms).map_err(to_js)
    }

    /// Animation frame callback; returns whether values are still moving.
    #[wasm_bindgen(js_name = onFrame)]
    pub fn on_frame(&mut self, timestamp_ms: f64, track_width: f64) -> bool {
        self.inner.on_frame(timestamp_ms, track_width)
    }

    #[wasm_bindgen(js_name = setReducedMotion)]
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.inner.set_reduced_motion(reduced);
    }

    #[wasm_bindgen(js_name = setPaused)]
    pub fn set_paused(&mut self, paused: bool) {
        self.inner.set_paused(paused);
    }

    /// Marquee `translateX` in px.
    #[wasm_bindgen(getter)]
    pub fn offset(&self) -> f64 {
        self.inner.offset()
    }

    /// Pills as JSON: key, label, display, target, text.
    #[wasm_bindgen(js_name = displayJson)]
    pub fn display_json(&self) -> String {
        self.inner.display_json()
    }

    /// Text for the `role="status"` live region.
    #[wasm_bindgen(js_name = a11yText)]
    pub fn a11y_text(&self) -> String {
        self.inner.a11y_text()
    }
}
