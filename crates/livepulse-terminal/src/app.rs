//! Terminal ticker runner.

use crate::error::TuiError;
use crate::input::{Action, InputHandler};
use crate::render::{self, Frame, LineRole};
use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use livepulse_core::{Clock, SystemClock, TickerConfig, TickerState};
use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

/// Terminal side effects of the ticker loop, so it can run headless.
pub trait TerminalBackend {
    /// Raw mode, alternate screen and hidden cursor.
    fn enter(&mut self) -> Result<(), TuiError>;
    /// Undo [`enter`](Self::enter). Best effort; also called after a failed enter.
    fn leave(&mut self);
    fn size(&self) -> Result<(u16, u16), TuiError>;
    /// Next input event arriving within `timeout`.
    fn next_event(&mut self, timeout: Duration) -> Result<Option<CrosstermEvent>, TuiError>;
    fn draw(&mut self, frame: &Frame, color: bool) -> Result<(), TuiError>;
}

const fn role_color(role: LineRole) -> Color {
    match role {
        LineRole::Header => Color::Green,
        LineRole::Metrics => Color::Cyan,
        LineRole::Status | LineRole::Muted => Color::DarkGrey,
    }
}

/// Write `frame` row by row, clearing leftovers from the previous frame.
pub fn write_frame<W: Write>(out: &mut W, frame: &Frame, color: bool) -> io::Result<()> {
    for (row, line) in frame.lines.iter().enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(out, cursor::MoveTo(0, row), Clear(ClearType::CurrentLine))?;
        if color {
            queue!(
                out,
                SetForegroundColor(role_color(line.role)),
                Print(&line.text),
                ResetColor
            )?;
        } else {
            queue!(out, Print(&line.text))?;
        }
    }
    queue!(out, Clear(ClearType::FromCursorDown))?;
    out.flush()
}

/// Backend on the process's stdout.
#[derive(Debug)]
pub struct CrosstermBackend {
    stdout: Stdout,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<(), TuiError> {
        enable_raw_mode()?;
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide)?;
        Ok(())
    }

    fn leave(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }

    fn size(&self) -> Result<(u16, u16), TuiError> {
        crossterm::terminal::size().map_err(|_| TuiError::TerminalNotAvailable)
    }

    fn next_event(&mut self, timeout: Duration) -> Result<Option<CrosstermEvent>, TuiError> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    fn draw(&mut self, frame: &Frame, color: bool) -> Result<(), TuiError> {
        write_frame(&mut self.stdout, frame, color)?;
        Ok(())
    }
}

/// Headless backend: scripted input, recorded frames, escape codes captured
/// in `W`.
#[derive(Debug)]
pub struct TestableBackend<W: Write> {
    writer: W,
    size: (u16, u16),
    active: bool,
    input: VecDeque<Option<CrosstermEvent>>,
    frames: Vec<Frame>,
}

impl<W: Write> TestableBackend<W> {
    pub fn new(writer: W, width: u16, height: u16) -> Self {
        Self {
            writer,
            size: (width, height),
            active: false,
            input: VecDeque::new(),
            frames: Vec::new(),
        }
    }

    /// One entry per wait: `None` times out, `Some` delivers the event.
    /// Once the script runs out every wait times out.
    #[must_use]
    pub fn with_input(mut self, script: Vec<Option<CrosstermEvent>>) -> Self {
        self.input = script.into();
        self
    }

    /// Between `enter` and `leave`.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TerminalBackend for TestableBackend<W> {
    fn enter(&mut self) -> Result<(), TuiError> {
        execute!(self.writer, EnterAlternateScreen, cursor::Hide)?;
        self.active = true;
        Ok(())
    }

    fn leave(&mut self) {
        let _ = execute!(self.writer, cursor::Show, LeaveAlternateScreen);
        self.active = false;
    }

    fn size(&self) -> Result<(u16, u16), TuiError> {
        Ok(self.size)
    }

    fn next_event(&mut self, _timeout: Duration) -> Result<Option<CrosstermEvent>, TuiError> {
        Ok(self.input.pop_front().flatten())
    }

    fn draw(&mut self, frame: &Frame, color: bool) -> Result<(), TuiError> {
        write_frame(&mut self.writer, frame, color)?;
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Configuration for the terminal ticker.
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Ticker settings shared with other hosts.
    pub ticker: TickerConfig,
    /// Colorize output.
    pub color: bool,
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            ticker: TickerConfig::default(),
            color: true,
            max_frames: None,
        }
    }
}

impl TuiConfig {
    /// Wrap a ticker config with terminal defaults.
    #[must_use]
    pub fn new(ticker: TickerConfig) -> Self {
        Self {
            ticker,
            ..Self::default()
        }
    }
}

/// Live ticker bound to a terminal.
pub struct TickerApp<C: Clock = SystemClock> {
    state: TickerState,
    clock: C,
    config: TuiConfig,
    input_handler: InputHandler,
    frame_count: u64,
    should_quit: bool,
}

impl TickerApp<SystemClock> {
    /// Create a ticker reading the system clock.
    pub fn new(config: TuiConfig) -> Result<Self, TuiError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> TickerApp<C> {
    /// Create a ticker reading `clock`.
    pub fn with_clock(config: TuiConfig, clock: C) -> Result<Self, TuiError> {
        let state = TickerState::new(clock.now_ms(), config.ticker.clone())?;
        Ok(Self {
            state,
            clock,
            config,
            input_handler: InputHandler::new(),
            frame_count: 0,
            should_quit: false,
        })
    }

    /// Set the input handler.
    #[must_use]
    pub fn with_input_handler(mut self, handler: InputHandler) -> Self {
        self.input_handler = handler;
        self
    }

    /// Ticker state.
    #[must_use]
    pub const fn state(&self) -> &TickerState {
        &self.state
    }

    /// Frames drawn so far.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Mutable access to the clock.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Request the application to quit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Apply one input action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::TogglePause => {
                let paused = !self.state.marquee().is_paused();
                self.state.set_paused(paused);
            }
            Action::ToggleReducedMotion => {
                let reduced = !self.state.reduced_motion();
                self.state.set_reduced_motion(reduced);
            }
            Action::Redraw => {}
        }
    }

    /// Run on the real terminal (blocking).
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.run_with_backend(CrosstermBackend::default()).map(|_| ())
    }

    /// Run with a custom backend.
    /// This is the testable entry point.
    pub fn run_with_backend<B: TerminalBackend>(&mut self, mut backend: B) -> Result<B, TuiError> {
        if let Err(e) = backend.enter() {
            backend.leave();
            return Err(e);
        }
        tracing::info!(
            bucket_ms = self.config.ticker.bucket_ms,
            reduced_motion = self.state.reduced_motion(),
            "terminal ticker started"
        );

        let result = self.run_loop(&mut backend);

        backend.leave();
        tracing::info!(frames = self.frame_count, "terminal ticker stopped");

        result.map(|()| backend)
    }

    fn run_loop<B: TerminalBackend>(&mut self, backend: &mut B) -> Result<(), TuiError> {
        let frame_interval = Duration::from_millis(self.config.ticker.frame_interval_ms);
        let mut last_frame = Instant::now();

        loop {
            let now_ms = self.clock.now_ms();
            self.state.on_bucket_timer(now_ms)?;

            let (width, height) = backend.size()?;
            let dt = last_frame.elapsed().as_secs_f64();
            last_frame = Instant::now();
            let track_width = render::track_width(&self.state.display_items());
            self.state.on_frame(dt, track_width as f64);

            let frame = render::render_frame(&self.state, width, height);
            backend.draw(&frame, self.config.color)?;
            self.frame_count += 1;

            if self
                .config
                .max_frames
                .is_some_and(|max| self.frame_count >= max)
            {
                self.should_quit = true;
            }

            let timeout = frame_interval.min(self.state.next_boundary_delay(now_ms)?);
            if !self.should_quit {
                if let Some(event) = backend.next_event(timeout)? {
                    if let Some(action) = self.input_handler.convert(&event) {
                        tracing::debug!(?action, "input");
                        self.handle_action(action);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }
}
