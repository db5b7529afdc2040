//! One-line status bar.

use crate::model::codec::format_offset;
use crate::state::{QueryMode, ViewerState};
use crate::view::styles::GridStyles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Widget},
};

/// Status bar: query mode, match position, cursor, selection, layout and
/// the last shared location.
pub struct StatusBar<'a> {
    state: &'a ViewerState,
    styles: &'a GridStyles,
    shared_location: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    /// Create the status bar.
    pub fn new(state: &'a ViewerState, styles: &'a GridStyles, shared_location: Option<&'a str>) -> Self {
        Self {
            state,
            styles,
            shared_location,
        }
    }

    fn match_text(&self) -> String {
        let search = &self.state.search;
        if search.mode == QueryMode::Offset || search.raw_input.is_empty() {
            return String::new();
        }
        if search.stale {
            return "searching…".to_string();
        }
        match search.selected {
            Some(i) => format!("match {}/{}", i + 1, search.matches.len()),
            None => "no matches".to_string(),
        }
    }

    /// Status segments, left to right. Empty ones are skipped.
    pub fn segments(&self) -> Vec<String> {
        let state = self.state;
        let layout = &state.layout;
        let mut segments = vec![
            format!("{} bytes", state.buffer.len()),
            state.search.mode.label().to_string(),
            self.match_text(),
        ];
        if let Some(index) = state.cursor.index {
            segments.push(format!(
                "@{}",
                format_offset(index as u64, layout.offset_base, 0)
            ));
        }
        if let Some(range) = state.selection.range {
            segments.push(format!("sel {}", range.len()));
        }
        segments.push(format!(
            "{}{} cols",
            layout.columns,
            if layout.columns_auto { " auto" } else { "" }
        ));
        segments.push(format!("base {}", layout.offset_base));
        if state.folding.active {
            segments.push("folded".to_string());
        }
        if let Some(location) = self.shared_location {
            segments.push(format!("?{location}"));
        }
        segments.retain(|s| !s.is_empty());
        segments
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = format!(" {}", self.segments().join(" │ "));
        Paragraph::new(Line::from(text))
            .style(self.styles.status)
            .render(area, buf);
    }
}
