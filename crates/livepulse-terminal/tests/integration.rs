//! Integration tests for livepulse-terminal.
//!
//! These drive the full runner against a testable backend.

use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use livepulse_core::{FixedClock, TickerConfig};
use livepulse_terminal::{LineRole, TestableBackend, TickerApp, TuiConfig};

const MIDDAY: i64 = 1_760_000_000_000;

fn key(code: KeyCode) -> CrosstermEvent {
    CrosstermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

#[test]
fn test_marquee_moves_between_frames() {
    let config = TuiConfig {
        color: false,
        max_frames: Some(3),
        ..TuiConfig::default()
    };
    let mut app = TickerApp::with_clock(config, FixedClock::new(MIDDAY)).expect("valid config");
    let backend = app
        .run_with_backend(TestableBackend::new(Vec::new(), 80, 12))
        .expect("runs");
    assert_eq!(backend.frames().len(), 3);
    for frame in backend.frames() {
        let metrics = frame
            .lines
            .iter()
            .find(|l| l.role == LineRole::Metrics)
            .expect("metric row");
        assert_eq!(metrics.text.chars().count(), 80);
    }
    assert!(app.state().marquee().offset() <= 0.0);
}

#[test]
fn test_reduced_motion_renders_static_grid() {
    let config = TuiConfig {
        ticker: TickerConfig {
            reduced_motion: true,
            ..TickerConfig::default()
        },
        color: false,
        max_frames: Some(2),
    };
    let mut app = TickerApp::with_clock(config, FixedClock::new(MIDDAY)).expect("valid config");
    let backend = app
        .run_with_backend(TestableBackend::new(Vec::new(), 50, 20))
        .expect("runs");
    let frame = &backend.frames()[1];
    let rows: Vec<&str> = frame
        .lines
        .iter()
        .filter(|l| l.role == LineRole::Metrics)
        .map(|l| l.text.as_str())
        .collect();
    assert!(rows.len() >= 3);
    assert!(rows.iter().any(|r| r.contains("12,351")));
    assert_eq!(app.state().marquee().offset(), 0.0);
}

#[test]
fn test_escape_quits_and_restores_terminal() {
    let backend =
        TestableBackend::new(Vec::new(), 80, 12).with_input(vec![None, Some(key(KeyCode::Esc))]);
    let config = TuiConfig {
        color: false,
        ..TuiConfig::default()
    };
    let mut app = TickerApp::with_clock(config, FixedClock::new(MIDDAY)).expect("valid config");
    let backend = app.run_with_backend(backend).expect("runs");
    assert_eq!(app.frame_count(), 2);
    assert!(!backend.is_active());
    let bytes = backend.into_writer();
    // LeaveAlternateScreen is \x1b[?1049l
    assert!(String::from_utf8_lossy(&bytes).contains("\x1b[?1049l"));
}

#[test]
fn test_invalid_config_is_core_error() {
    let config = TuiConfig::new(TickerConfig {
        bucket_ms: -1,
        ..TickerConfig::default()
    });
    let err = TickerApp::with_clock(config, FixedClock::new(MIDDAY))
        .err()
        .expect("rejected");
    assert!(err.to_string().contains("invalid bucket width"));
}
