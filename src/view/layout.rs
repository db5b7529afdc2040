//! Screen layout rendering.
//!
//! Pure layout logic: the search bar on top, the bordered byte grid in the
//! middle, the status bar at the bottom.

use crate::model::GlyphSet;
use crate::state::ViewerState;
use crate::view::constants::{SEARCH_BAR_HEIGHT, STATUS_BAR_HEIGHT};
use crate::view::grid::HexGrid;
use crate::view::search_input::SearchInput;
use crate::view::status_bar::StatusBar;
use crate::view::styles::GridStyles;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Areas of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    /// Search bar, including its border.
    pub search: Rect,
    /// Grid block, including its border.
    pub grid_block: Rect,
    /// Grid content inside the border; used for hit testing.
    pub grid: Rect,
    /// Status bar.
    pub status: Rect,
}

/// Split the frame into its areas.
pub fn calculate_areas(frame_area: Rect) -> ScreenAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SEARCH_BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(frame_area);
    let grid_block = chunks[1];
    ScreenAreas {
        search: chunks[0],
        grid_block,
        grid: Block::default().borders(Borders::ALL).inner(grid_block),
        status: chunks[2],
    }
}

/// Everything the frame needs besides the snapshot.
pub struct RenderContext<'a> {
    /// Styles.
    pub styles: &'a GridStyles,
    /// Text-column glyphs.
    pub glyphs: GlyphSet,
    /// Last location shared with the share key.
    pub shared_location: Option<&'a str>,
}

/// Render one frame.
pub fn render_layout(frame: &mut Frame, state: &ViewerState, context: &RenderContext<'_>) {
    let areas = calculate_areas(frame.area());

    frame.render_widget(SearchInput::new(state, context.styles), areas.search);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(grid_title(state));
    frame.render_widget(block, areas.grid_block);
    if state.buffer.is_empty() {
        frame.render_widget(Paragraph::new(Line::from("(empty input)")), areas.grid);
    } else {
        frame.render_widget(HexGrid::new(state, context.styles, context.glyphs), areas.grid);
    }

    frame.render_widget(
        StatusBar::new(state, context.styles, context.shared_location),
        areas.status,
    );
}

fn grid_title(state: &ViewerState) -> String {
    let visible = state.visible_rows();
    if visible <= state.layout.rows {
        " hexgrid ".to_string()
    } else {
        let last = (state.scroll.top_row + state.layout.rows).min(visible);
        format!(" hexgrid  rows {}-{} of {} ", state.scroll.top_row + 1, last, visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ByteBuffer;
    use crate::state::LayoutState;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn areas_stack_search_grid_status() {
        let areas = calculate_areas(Rect::new(0, 0, 80, 24));
        assert_eq!(areas.search, Rect::new(0, 0, 80, 3));
        assert_eq!(areas.grid_block, Rect::new(0, 3, 80, 20));
        assert_eq!(areas.grid, Rect::new(1, 4, 78, 18));
        assert_eq!(areas.status, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn grid_rows_match_terminal_metrics() {
        // The cell metrics reserve six rows for bars and borders.
        let metrics = crate::state::LayoutMetrics::cells();
        let areas = calculate_areas(Rect::new(0, 0, 80, 24));
        assert_eq!(
            crate::state::layout::recompute_rows(24, &metrics),
            usize::from(areas.grid.height)
        );
    }

    #[test]
    fn render_layout_draws_every_area() {
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        let state = ViewerState::new(ByteBuffer::from(&b"hello"[..]), LayoutState::default());
        let styles = GridStyles::default();
        let context = RenderContext {
            styles: &styles,
            glyphs: GlyphSet::default(),
            shared_location: None,
        };

        terminal
            .draw(|frame| render_layout(frame, &state, &context))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = (0..buffer.area.height)
            .flat_map(|y| (0..buffer.area.width).map(move |x| (x, y)))
            .map(|(x, y)| buffer[(x, y)].symbol().to_string())
            .collect();
        assert!(text.contains("Search [text]"));
        assert!(text.contains("68 65 6C 6C 6F"));
        assert!(text.contains("5 bytes"));
    }

    #[test]
    fn empty_input_renders_placeholder() {
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        let state = ViewerState::default();
        let styles = GridStyles::default();
        let context = RenderContext {
            styles: &styles,
            glyphs: GlyphSet::default(),
            shared_location: None,
        };
        terminal
            .draw(|frame| render_layout(frame, &state, &context))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let row: String = (0..40).map(|x| buffer[(x, 4)].symbol().to_string()).collect();
        assert!(row.contains("(empty input)"));
    }
}
