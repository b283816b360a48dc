//! Error types for livepulse-terminal.

use livepulse_core::PulseError;
use thiserror::Error;

/// Errors that can occur while running the terminal ticker.
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error from terminal operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bucketing or configuration failure from the core crate.
    #[error("ticker error: {0}")]
    Core(#[from] PulseError),

    /// Terminal not available.
    #[error("Terminal not available")]
    TerminalNotAvailable,
}
