//! Scroll position over visible (folding-aware) rows.

use crate::state::folding::FoldingState;

/// Scroll motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMotion {
    /// Relative move by visible rows; negative scrolls up.
    Rows(i64),
    /// One screenful up.
    PageUp,
    /// One screenful down.
    PageDown,
    /// First row.
    Home,
    /// Last screenful.
    End,
}

/// First visible row of the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// Index into visible rows, within `[0, max(visible - rows, 0)]`.
    pub top_row: usize,
}

/// Geometry a scroll transition needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollBounds {
    /// Total visible rows (after folding).
    pub visible_rows: usize,
    /// Rows that fit on screen.
    pub page_rows: usize,
}

impl ScrollBounds {
    /// Largest valid `top_row`.
    pub fn max_top(&self) -> usize {
        self.visible_rows.saturating_sub(self.page_rows)
    }
}

/// Clamp `top_row` into bounds.
pub fn clamp(state: ScrollState, bounds: ScrollBounds) -> ScrollState {
    ScrollState {
        top_row: state.top_row.min(bounds.max_top()),
    }
}

/// Apply a scroll motion.
pub fn scroll(state: ScrollState, motion: ScrollMotion, bounds: ScrollBounds) -> ScrollState {
    let page = bounds.page_rows.max(1) as i64;
    let top = state.top_row as i64;
    let target = match motion {
        ScrollMotion::Rows(delta) => top.saturating_add(delta),
        ScrollMotion::PageUp => top - page,
        ScrollMotion::PageDown => top + page,
        ScrollMotion::Home => 0,
        ScrollMotion::End => bounds.max_top() as i64,
    };
    ScrollState {
        top_row: target.clamp(0, bounds.max_top() as i64) as usize,
    }
}

/// Move `top_row` as little as possible so the row holding byte `index`
/// is on screen.
pub fn scroll_into_view(
    state: ScrollState,
    index: usize,
    columns: usize,
    folding: &FoldingState,
    bounds: ScrollBounds,
) -> ScrollState {
    let row = folding.visible_row_of(index / columns.max(1));
    let page = bounds.page_rows.max(1);
    let top_row = if row < state.top_row {
        row
    } else if row >= state.top_row + page {
        row + 1 - page
    } else {
        state.top_row
    };
    clamp(ScrollState { top_row }, bounds)
}
