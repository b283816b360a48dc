//! Browser runtime for the livepulse ticker.
//!
//! The host page owns `setTimeout` and `requestAnimationFrame`; this module
//! answers "what changed" for each callback.

// WASM-only modules
#[cfg(target_arch = "wasm32")]
pub mod app;

// Cross-platform modules
pub mod bridge;

#[cfg(target_arch = "wasm32")]
pub use app::LiveTicker;
pub use bridge::{millis_from_js, resolve_reduced_motion, TickerBridge};
