//! Search bar widget.

use crate::state::{Focus, ViewerState};
use crate::view::styles::GridStyles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Search bar widget.
///
/// Shows the query with a caret while focused, the query mode in the title,
/// and the history position while browsing.
pub struct SearchInput<'a> {
    state: &'a ViewerState,
    styles: &'a GridStyles,
}

impl<'a> SearchInput<'a> {
    /// Create new SearchInput widget.
    pub fn new(state: &'a ViewerState, styles: &'a GridStyles) -> Self {
        Self { state, styles }
    }

    fn title(&self) -> String {
        let search = &self.state.search;
        let history = &self.state.history;
        match history.read_cursor {
            Some(i) => format!(
                " Search [{}] history {}/{} ",
                search.mode.label(),
                i + 1,
                history.entries.len()
            ),
            None => format!(" Search [{}] ", search.mode.label()),
        }
    }

    fn query_line(&self) -> Line<'static> {
        let search = &self.state.search;
        if self.state.focus != Focus::SearchBar {
            return Line::from(search.raw_input.clone());
        }

        // Split query into before/after caret for rendering the caret cell
        let before: String = search.raw_input.chars().take(search.caret).collect();
        let mut after = search.raw_input.chars().skip(search.caret);
        let caret_char = after.next().map_or_else(|| " ".to_string(), String::from);
        let after_text: String = after.collect();

        Line::from(vec![
            Span::raw(before),
            Span::styled(caret_char, self.styles.caret),
            Span::raw(after_text),
        ])
    }
}

impl Widget for SearchInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.state.focus == Focus::SearchBar {
            self.styles.focused_border
        } else {
            Style::default()
        };
        let paragraph = Paragraph::new(self.query_line()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(self.title()),
        );
        paragraph.render(area, buf);
    }
}
