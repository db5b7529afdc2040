//! Byte grid widget.
//!
//! Each visible row is an offset label, the hex pairs and the text glyphs:
//!
//! ```text
//! 00000010  48 65 6C 6C 6F 00 FF 0A  Hello0..
//! ```
//!
//! Folded regions render their hidden rows as one placeholder line.

use crate::model::codec::{format_offset, hex_token};
use crate::model::{classify, GlyphSet};
use crate::state::{RowKind, RowMapEntry, ViewerState};
use crate::view::constants::{HEX_CELL_WIDTH, OFFSET_GAP, TEXT_GAP};
use crate::view::styles::{GridStyles, Highlight};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

// ===== Geometry =====

/// Horizontal layout of one grid row, in cells relative to the grid area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    /// Offset label width.
    pub offset_width: u16,
    /// Byte columns per row.
    pub columns: u16,
}

impl GridGeometry {
    /// Geometry of `state`'s current layout.
    pub fn of(state: &ViewerState) -> Self {
        Self {
            offset_width: u16::try_from(state.layout.offset_digit_width).unwrap_or(u16::MAX),
            columns: u16::try_from(state.layout.columns).unwrap_or(u16::MAX),
        }
    }

    /// First cell of the hex column.
    pub fn hex_start(&self) -> u16 {
        self.offset_width.saturating_add(OFFSET_GAP)
    }

    /// First cell of the text column.
    pub fn text_start(&self) -> u16 {
        self.hex_start()
            .saturating_add(self.columns.saturating_mul(HEX_CELL_WIDTH))
            .saturating_add(TEXT_GAP)
    }

    /// Byte column under relative cell `x`, in either the hex or the text
    /// column. The space after a hex pair belongs to that pair.
    pub fn column_at(&self, x: u16) -> Option<u16> {
        let hex_start = self.hex_start();
        let hex_end = hex_start.saturating_add(self.columns.saturating_mul(HEX_CELL_WIDTH));
        let text_start = self.text_start();
        if (hex_start..hex_end).contains(&x) {
            Some((x - hex_start) / HEX_CELL_WIDTH)
        } else if (text_start..text_start.saturating_add(self.columns)).contains(&x) {
            Some(x - text_start)
        } else {
            None
        }
    }
}

// ===== Hit testing =====

/// Byte under terminal cell `(x, y)` of a grid drawn into `area`.
///
/// `None` outside the area, over labels and gaps, over fold placeholders,
/// and past the end of the buffer.
pub fn byte_at(state: &ViewerState, area: Rect, x: u16, y: u16) -> Option<usize> {
    if !area.contains((x, y).into()) {
        return None;
    }
    let visible_row = state.scroll.top_row + usize::from(y - area.y);
    let entry = state.row_at(visible_row)?;
    if entry.kind == RowKind::Hide {
        return None;
    }
    let column = GridGeometry::of(state).column_at(x - area.x)?;
    let index = entry.buffer_row * state.layout.columns + usize::from(column);
    (index < state.buffer.len()).then_some(index)
}

// ===== Widget =====

/// Byte grid widget.
pub struct HexGrid<'a> {
    state: &'a ViewerState,
    styles: &'a GridStyles,
    glyphs: GlyphSet,
}

impl<'a> HexGrid<'a> {
    /// Create a grid over `state`.
    pub fn new(state: &'a ViewerState, styles: &'a GridStyles, glyphs: GlyphSet) -> Self {
        Self {
            state,
            styles,
            glyphs,
        }
    }

    fn highlight(&self, index: usize) -> Highlight {
        let state = self.state;
        if state.cursor.index == Some(index) {
            Highlight::Cursor
        } else if state.search.is_selected_match_byte(index) {
            Highlight::SelectedMatch
        } else if state.search.is_match_byte(index) {
            Highlight::Match
        } else if state.selection.range.is_some_and(|r| r.contains(index)) {
            Highlight::Selection
        } else {
            Highlight::None
        }
    }

    /// Rows hidden behind the placeholder for visible row `visible_row`.
    fn hidden_rows(&self, visible_row: usize, entry: RowMapEntry) -> usize {
        let next = self
            .state
            .row_at(visible_row + 1)
            .map_or(self.state.total_rows(), |e| e.buffer_row);
        next.saturating_sub(entry.buffer_row)
    }

    fn render_bytes(&self, entry: RowMapEntry, area: Rect, y: u16, buf: &mut Buffer) {
        let layout = &self.state.layout;
        let geometry = GridGeometry::of(self.state);
        let first = entry.buffer_row * layout.columns;
        let label = format_offset(first as u64, layout.offset_base, layout.offset_digit_width);
        put(buf, area, 0, y, &label, self.styles.offset());

        let row = self.state.buffer.row(entry.buffer_row, layout.columns);
        for (column, &byte) in (0u16..).zip(row) {
            let index = first + usize::from(column);
            let style = self.styles.byte(classify(byte), self.highlight(index));
            let pair: String = hex_token(byte).iter().collect();
            let hex_x = geometry.hex_start() + column * HEX_CELL_WIDTH;
            put(buf, area, hex_x, y, &pair, style);
            let glyph = self.glyphs.glyph(byte).to_string();
            put(buf, area, geometry.text_start() + column, y, &glyph, style);
        }
    }
}

impl Widget for HexGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let top = self.state.scroll.top_row;
        for (line, visible_row) in (0..area.height).zip(top..) {
            let Some(entry) = self.state.row_at(visible_row) else {
                break;
            };
            let y = area.y + line;
            match entry.kind {
                RowKind::Show => self.render_bytes(entry, area, y, buf),
                RowKind::Hide => {
                    let hidden = self.hidden_rows(visible_row, entry);
                    let text = format!("⋯ {hidden} identical rows");
                    let x = GridGeometry::of(self.state).hex_start();
                    put(buf, area, x, y, &text, self.styles.fold());
                }
            }
        }
    }
}

/// Write `text` at relative column `x` of row `y`, clipped to `area`.
fn put(buf: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    if x >= area.width {
        return;
    }
    buf.set_stringn(area.x + x, y, text, usize::from(area.width - x), style);
}

#[cfg(test)]
#[path = "grid_tests.rs"]
mod tests;
