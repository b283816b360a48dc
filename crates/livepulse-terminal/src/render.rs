//! Pure frame layout for the terminal ticker.
//!
//! Widths are measured in terminal columns with `unicode-width`, so labels
//! containing the non-breaking hyphen or other wide glyphs line up.

use livepulse_core::{DisplayItem, TickerState};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Title line.
pub const HEADER: &str = "\u{25cf} Live Service Snapshot (IST)";

/// Gap between pills.
pub const SEPARATOR: &str = "  \u{2502}  ";

/// Key help line.
pub const HINT: &str = "q quit \u{b7} p pause \u{b7} m motion";

/// Semantic role of a line, used for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// Title.
    Header,
    /// Metric pills.
    Metrics,
    /// Screen-reader summary.
    Status,
    /// Key help and blank spacer lines.
    Muted,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Text, at most the frame width in columns.
    pub text: String,
    /// Role for coloring.
    pub role: LineRole,
}

impl Line {
    fn new(text: impl Into<String>, role: LineRole) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }
}

/// A full screen of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Rows from the top of the screen.
    pub lines: Vec<Line>,
}

impl Frame {
    /// Plain text of every row, one per line.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Caption and formatted value of one pill.
#[must_use]
pub fn pill_text(item: &DisplayItem) -> String {
    format!("{} {}", item.label, item.text)
}

/// One copy of the marquee track: every pill followed by a separator.
#[must_use]
pub fn track(items: &[DisplayItem]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&pill_text(item));
        out.push_str(SEPARATOR);
    }
    out
}

/// Column width of the doubled track, as fed to the marquee.
#[must_use]
pub fn track_width(items: &[DisplayItem]) -> usize {
    track(items).width() * 2
}

/// `width` columns of `text` starting at column `skip`, padded with spaces.
///
/// A wide glyph cut by either edge is replaced by spaces.
#[must_use]
pub fn window(text: &str, skip: usize, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut col = 0;
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        let end = col + w;
        if end <= skip {
            col = end;
            continue;
        }
        if col < skip {
            let visible = end - skip;
            let pad = visible.min(width - used);
            out.extend(std::iter::repeat(' ').take(pad));
            used += pad;
        } else if used + w <= width {
            out.push(ch);
            used += w;
        } else {
            break;
        }
        col = end;
        if used >= width {
            break;
        }
    }
    out.extend(std::iter::repeat(' ').take(width - used));
    out
}

/// Greedy word wrap to `width` columns.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split(' ') {
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
        .into_iter()
        .map(|line| {
            if line.width() > width {
                window(&line, 0, width).trim_end().to_string()
            } else {
                line
            }
        })
        .collect()
}

/// Scrolling strip for the animated display.
#[must_use]
pub fn marquee_line(items: &[DisplayItem], offset: f64, width: usize) -> String {
    let single = track(items);
    let single_width = single.width();
    if single_width == 0 || width == 0 {
        return " ".repeat(width);
    }
    // Enough copies to cover the view from any offset inside one copy.
    let copies = width / single_width + 2;
    let strip = single.repeat(copies);
    let skip = (-offset).max(0.0).floor() as usize % single_width;
    window(&strip, skip, width)
}

/// Static rows of pills for reduced motion.
#[must_use]
pub fn grid_lines(items: &[DisplayItem], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for pill in items.iter().map(pill_text) {
        if !current.is_empty() && current.width() + SEPARATOR.width() + pill.width() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str(SEPARATOR);
        }
        current.push_str(&pill);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
        .into_iter()
        .map(|line| window(&line, 0, width).trim_end().to_string())
        .collect()
}

/// Lay out one screen for `state` in a `width` x `height` terminal.
#[must_use]
pub fn render_frame(state: &TickerState, width: u16, height: u16) -> Frame {
    let width = usize::from(width);
    let items = state.display_items();
    let mut lines = Vec::new();

    let header = if state.marquee().is_paused() {
        format!("{HEADER} (paused)")
    } else {
        HEADER.to_string()
    };
    lines.push(Line::new(window(&header, 0, width).trim_end(), LineRole::Header));
    lines.push(Line::new("", LineRole::Muted));

    if state.reduced_motion() {
        for row in grid_lines(&items, width) {
            lines.push(Line::new(row, LineRole::Metrics));
        }
    } else {
        lines.push(Line::new(
            marquee_line(&items, state.marquee().offset(), width),
            LineRole::Metrics,
        ));
    }
    lines.push(Line::new("", LineRole::Muted));

    for row in wrap(&state.a11y_text(), width) {
        lines.push(Line::new(row, LineRole::Status));
    }
    lines.push(Line::new(window(HINT, 0, width).trim_end(), LineRole::Muted));

    lines.truncate(usize::from(height));
    Frame { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livepulse_core::{MetricKey, TickerConfig};
    use proptest::prelude::*;

    const MIDDAY: i64 = 1_760_000_000_000;

    fn item(label: &str, text: &str) -> DisplayItem {
        DisplayItem {
            key: MetricKey::Cloud,
            label: label.to_string(),
            display: 0.0,
            target: 0.0,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_window_plain() {
        assert_eq!(window("abcdef", 2, 3), "cde");
        assert_eq!(window("abc", 1, 5), "bc   ");
        assert_eq!(window("abc", 10, 2), "  ");
    }

    #[test]
    fn test_window_wide_glyph_cut() {
        // U+4E2D is two columns wide.
        assert_eq!(window("a\u{4e2d}b", 2, 2), " b");
        assert_eq!(window("a\u{4e2d}b", 0, 2), "a ");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd"]);
    }

    #[test]
    fn test_track_width_counts_columns() {
        let items = vec![item("On\u{2011}prem Instances", "33")];
        let single = "On\u{2011}prem Instances 33".width() + SEPARATOR.width();
        assert_eq!(track_width(&items), single * 2);
    }

    #[test]
    fn test_marquee_line_scrolls() {
        let items = vec![item("A", "1"), item("B", "2")];
        let at_zero = marquee_line(&items, 0.0, 8);
        assert!(at_zero.starts_with("A 1"));
        let shifted = marquee_line(&items, -2.0, 8);
        assert!(shifted.starts_with('1'));
        assert_eq!(shifted.width(), 8);
    }

    #[test]
    fn test_grid_wraps_pills() {
        let items = vec![item("Alpha", "1"), item("Beta", "2"), item("Gamma", "3")];
        let rows = grid_lines(&items, 20);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("Alpha 1"));
        assert!(rows[1].contains("Gamma 3"));
    }

    #[test]
    fn test_render_frame_animated() {
        let mut state = TickerState::new(MIDDAY, TickerConfig::default()).unwrap();
        state.mark_mounted();
        let frame = render_frame(&state, 120, 24);
        assert_eq!(frame.lines[0].role, LineRole::Header);
        assert_eq!(frame.lines[2].role, LineRole::Metrics);
        assert!(frame.lines[2].text.starts_with("Active Deployments 63"));
        let text = frame.to_plain_text();
        assert!(text.contains("Status: 63 active deployments"));
        assert!(text.ends_with(HINT));
    }

    #[test]
    fn test_render_frame_reduced_motion_grid() {
        let config = TickerConfig {
            reduced_motion: true,
            ..TickerConfig::default()
        };
        let state = TickerState::new(MIDDAY, config).unwrap();
        let frame = render_frame(&state, 60, 24);
        let metric_rows = frame
            .lines
            .iter()
            .filter(|l| l.role == LineRole::Metrics)
            .count();
        assert!(metric_rows > 1);
        assert!(frame.to_plain_text().contains("Status: live metrics updating."));
    }

    #[test]
    fn test_render_frame_paused_header_and_height() {
        let mut state = TickerState::new(MIDDAY, TickerConfig::default()).unwrap();
        state.set_paused(true);
        let frame = render_frame(&state, 80, 2);
        assert_eq!(frame.lines.len(), 2);
        assert!(frame.lines[0].text.ends_with("(paused)"));
    }

    proptest! {
        #[test]
        fn prop_window_width_exact(text in "[a-z \u{4e2d}\u{2011}]{0,40}", skip in 0usize..50, width in 0usize..30) {
            prop_assert_eq!(window(&text, skip, width).width(), width);
        }

        #[test]
        fn prop_marquee_line_fills_width(offset in -5_000.0f64..0.0, width in 1usize..200) {
            let state = TickerState::new(MIDDAY, TickerConfig::default()).unwrap();
            let line = marquee_line(&state.display_items(), offset, width);
            prop_assert_eq!(line.width(), width);
        }
    }
}
