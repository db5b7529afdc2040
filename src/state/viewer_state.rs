//! Aggregate viewer snapshot.

use crate::model::ByteBuffer;
use crate::state::cursor::CursorState;
use crate::state::folding::{self, FoldingState, RowMapEntry};
use crate::state::history::HistoryState;
use crate::state::layout::{self, LayoutState};
use crate::state::location::{Location, LocationState};
use crate::state::scroll::{ScrollBounds, ScrollState};
use crate::state::search::SearchState;
use crate::state::selection::SelectionState;
use crate::state::settings::Settings;

/// Which widget receives keystrokes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    /// The byte grid: arrows move the cursor.
    #[default]
    Grid,
    /// The search bar: keys edit the query, arrows may browse history.
    SearchBar,
}

/// Immutable snapshot of one viewing session.
///
/// Every field is owned by exactly one controller and only changes through
/// [`crate::state::reducer::dispatch`], which returns a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerState {
    /// Loaded payload.
    pub buffer: ByteBuffer,
    /// Focused byte.
    pub cursor: CursorState,
    /// Selected range and drag.
    pub selection: SelectionState,
    /// Query and results.
    pub search: SearchState,
    /// Committed queries.
    pub history: HistoryState,
    /// Grid geometry.
    pub layout: LayoutState,
    /// Row folding.
    pub folding: FoldingState,
    /// First visible row.
    pub scroll: ScrollState,
    /// Location hydration gate.
    pub location: LocationState,
    /// Keystroke routing.
    pub focus: Focus,
}

impl ViewerState {
    /// Fresh session over `buffer` with the given layout.
    pub fn new(buffer: ByteBuffer, layout: LayoutState) -> Self {
        let layout = layout::refit_offsets(layout, buffer.len());
        Self {
            buffer,
            layout,
            ..Self::default()
        }
    }

    /// Buffer rows at the current column count.
    pub fn total_rows(&self) -> usize {
        self.buffer.row_count(self.layout.columns)
    }

    /// Rows after folding.
    pub fn visible_rows(&self) -> usize {
        self.folding.visible_rows(self.total_rows())
    }

    /// Geometry for scroll transitions.
    pub fn scroll_bounds(&self) -> ScrollBounds {
        ScrollBounds {
            visible_rows: self.visible_rows(),
            page_rows: self.layout.rows,
        }
    }

    /// Buffer row behind visible row `visible_row`.
    pub fn row_at(&self, visible_row: usize) -> Option<RowMapEntry> {
        self.folding.row_at(visible_row, self.total_rows())
    }

    /// Visible rows currently on screen, top to bottom.
    pub fn rows_on_screen(&self) -> impl Iterator<Item = RowMapEntry> + '_ {
        let top = self.scroll.top_row;
        (top..top + self.layout.rows).map_while(move |row| self.row_at(row))
    }

    /// Shareable location of this snapshot.
    pub fn location(&self) -> Location {
        Location::capture(&self.cursor, &self.selection, &self.search)
    }

    /// Persistable settings of this snapshot.
    pub fn settings(&self) -> Settings {
        Settings::capture(&self.layout, self.history.show_last_value)
    }

    /// Re-derive fold regions for the current buffer and columns. Detected
    /// regions are only computed while folding is on.
    pub(crate) fn refold(self) -> Self {
        let needs_refresh = self.folding.active
            || self.folding.source == folding::RegionSource::External;
        if !needs_refresh {
            return self;
        }
        let folding = folding::refresh(self.folding, &self.buffer, self.layout.columns);
        Self { folding, ..self }
    }
}
