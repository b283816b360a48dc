//! Terminal host for the livepulse metrics ticker.
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
//!
//! Draws the ticker with `crossterm` directly: a header, the scrolling pill
//! strip (or a static grid under reduced motion), the screen-reader summary
//! and a key help line.
//!
//! # Example
//!
//! ```ignore
//! use livepulse_terminal::{TickerApp, TuiConfig};
//!
//! TickerApp::new(TuiConfig::default())?.run()?;
//! ```

mod app;
mod error;
mod input;
pub mod render;

pub use app::{
    write_frame, CrosstermBackend, TerminalBackend, TestableBackend, TickerApp, TuiConfig,
};
pub use error::TuiError;
pub use input::{Action, InputHandler, KeyBinding};
pub use render::{render_frame, Frame, Line, LineRole};
