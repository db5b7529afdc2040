//! Layout engine (pure).
//!
//! Derives the grid geometry (byte columns, visible rows, offset label width)
//! from viewport measurements and user overrides. Auto-sized dimensions are
//! recomputed on every resize; manual ones are left alone until auto mode is
//! switched back on.

use crate::model::codec::{clamp_offset_base, digit_count};
use serde::{Deserialize, Serialize};

/// Default number of byte columns before any viewport is known.
pub const DEFAULT_COLUMNS: usize = 16;
/// Default number of visible rows before any viewport is known.
pub const DEFAULT_ROWS: usize = 24;
/// Default offset base.
pub const DEFAULT_OFFSET_BASE: u32 = 16;
/// Fewest rows the grid ever shows.
pub const MIN_ROWS: usize = 3;

const WIDE_OFFSET_DIGITS: usize = 8;
const NARROW_OFFSET_DIGITS: usize = 4;

/// Column counts offered by the breakpoint tables, widest first.
const COLUMN_STEPS: [usize; 14] = [128, 112, 96, 80, 64, 48, 40, 32, 24, 16, 12, 8, 4, 2];

/// Viewport size in the units of the active [`LayoutMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Horizontal extent.
    pub width: u32,
    /// Vertical extent.
    pub height: u32,
}

/// One row of the column breakpoint table: widths strictly above
/// `min_width` get `columns` byte columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnBreakpoint {
    /// Exclusive lower bound on viewport width.
    pub min_width: u32,
    /// Byte columns granted above that width.
    pub columns: usize,
}

/// Measurement constants for a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMetrics {
    /// Height of one grid row.
    pub row_height: u32,
    /// Space above the grid (toolbar, header).
    pub top_offset: u32,
    /// Rows withheld from the computed count.
    pub fixed_margin: u32,
    /// Widths at or below this use short offset labels.
    pub narrow_width: u32,
    /// Descending breakpoint table.
    pub breakpoints: Vec<ColumnBreakpoint>,
    /// Width taken by each offset label digit past the wide default. The
    /// breakpoint tables assume eight-digit labels.
    pub digit_width: u32,
}

impl LayoutMetrics {
    /// Pixel metrics of the browser surface.
    pub fn pixels() -> Self {
        const PIXEL_THRESHOLDS: [u32; 14] = [
            4750, 4174, 3598, 3022, 2446, 1870, 1582, 1294, 1006, 718, 574, 430, 286, 215,
        ];
        Self {
            row_height: 22,
            top_offset: 40,
            fixed_margin: 1,
            narrow_width: 600,
            digit_width: 8,
            breakpoints: PIXEL_THRESHOLDS
                .iter()
                .zip(COLUMN_STEPS)
                .map(|(&min_width, columns)| ColumnBreakpoint { min_width, columns })
                .collect(),
        }
    }

    /// Terminal cell metrics.
    ///
    /// A byte column costs four cells (`"FF "` plus its glyph); thirteen
    /// cells go to an eight-digit offset label, separators and borders.
    pub fn cells() -> Self {
        Self {
            row_height: 1,
            top_offset: 6,
            fixed_margin: 0,
            narrow_width: 60,
            digit_width: 1,
            breakpoints: COLUMN_STEPS
                .iter()
                .map(|&columns| ColumnBreakpoint {
                    min_width: 13 + 4 * columns as u32,
                    columns,
                })
                .collect(),
        }
    }

    /// Replace the breakpoint table, re-sorted widest first. Zero-column
    /// rows are dropped; an empty table keeps the current one.
    pub fn with_breakpoints(mut self, mut breakpoints: Vec<ColumnBreakpoint>) -> Self {
        breakpoints.retain(|b| b.columns > 0);
        if !breakpoints.is_empty() {
            breakpoints.sort_by(|a, b| b.min_width.cmp(&a.min_width));
            self.breakpoints = breakpoints;
        }
        self
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::pixels()
    }
}

/// Largest column count whose threshold `width` exceeds; 1 below the table.
///
/// Non-decreasing in `width` for any table, since the first match in a
/// descending scan is the maximum over all rows the width clears.
pub fn recompute_columns(width: u32, metrics: &LayoutMetrics) -> usize {
    metrics
        .breakpoints
        .iter()
        .filter(|b| width > b.min_width)
        .map(|b| b.columns)
        .max()
        .unwrap_or(1)
}

/// `floor(|height - top_offset| / row_height) - fixed_margin`, at least 3.
pub fn recompute_rows(height: u32, metrics: &LayoutMetrics) -> usize {
    let usable = height.abs_diff(metrics.top_offset);
    let rows = (usable / metrics.row_height.max(1)).saturating_sub(metrics.fixed_margin);
    (rows as usize).max(MIN_ROWS)
}

/// Whether the viewport is narrow enough for short offset labels.
pub fn is_narrow(width: u32, metrics: &LayoutMetrics) -> bool {
    width <= metrics.narrow_width
}

/// Offset label width: the narrow/wide minimum, widened to fit the last
/// address of a buffer of `len` bytes in `base`.
pub fn offset_digit_width(narrow: bool, len: usize, base: u32) -> usize {
    let minimum = if narrow {
        NARROW_OFFSET_DIGITS
    } else {
        WIDE_OFFSET_DIGITS
    };
    let last = len.saturating_sub(1) as u64;
    minimum.max(digit_count(last, base))
}

/// Width left for byte columns after paying for offset labels longer than
/// the breakpoint tables assume.
pub fn column_budget(width: u32, digits: usize, metrics: &LayoutMetrics) -> u32 {
    let extra = u32::try_from(digits.saturating_sub(WIDE_OFFSET_DIGITS)).unwrap_or(u32::MAX);
    width.saturating_sub(extra.saturating_mul(metrics.digit_width))
}

/// Grid geometry and sizing mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutState {
    /// Byte columns per row, at least 1.
    pub columns: usize,
    /// Visible grid rows, at least 1.
    pub rows: usize,
    /// Columns follow the viewport width.
    pub columns_auto: bool,
    /// Rows follow the viewport height.
    pub rows_auto: bool,
    /// Base of offset labels, in `2..=36`.
    pub offset_base: u32,
    /// Digits in an offset label.
    pub offset_digit_width: usize,
    /// Narrow viewport flag from the last resize.
    pub narrow: bool,
    /// Last measured viewport.
    pub viewport: Option<Viewport>,
    /// Measurement constants.
    pub metrics: LayoutMetrics,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            columns_auto: true,
            rows_auto: true,
            offset_base: DEFAULT_OFFSET_BASE,
            offset_digit_width: WIDE_OFFSET_DIGITS,
            narrow: false,
            viewport: None,
            metrics: LayoutMetrics::default(),
        }
    }
}

impl LayoutState {
    /// Default layout measured with `metrics`.
    pub fn with_metrics(metrics: LayoutMetrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }
}

/// Record a new viewport and recompute every auto dimension.
pub fn resize(state: LayoutState, viewport: Viewport, len: usize) -> LayoutState {
    let narrow = is_narrow(viewport.width, &state.metrics);
    let digits = offset_digit_width(narrow, len, state.offset_base);
    let columns = if state.columns_auto {
        recompute_columns(
            column_budget(viewport.width, digits, &state.metrics),
            &state.metrics,
        )
    } else {
        state.columns
    };
    let rows = if state.rows_auto {
        recompute_rows(viewport.height, &state.metrics)
    } else {
        state.rows
    };
    LayoutState {
        columns,
        rows,
        narrow,
        offset_digit_width: digits,
        viewport: Some(viewport),
        ..state
    }
}

/// Manual column count. Switches columns to manual; zero is ignored.
pub fn set_columns(state: LayoutState, columns: usize) -> LayoutState {
    if columns == 0 {
        return state;
    }
    LayoutState {
        columns,
        columns_auto: false,
        ..state
    }
}

/// Manual row count. Switches rows to manual; zero is ignored.
pub fn set_rows(state: LayoutState, rows: usize) -> LayoutState {
    if rows == 0 {
        return state;
    }
    LayoutState {
        rows,
        rows_auto: false,
        ..state
    }
}

/// Toggle automatic columns. Enabling recomputes at once when a viewport
/// has been measured; otherwise the next resize does it.
pub fn set_columns_auto(state: LayoutState, auto: bool, len: usize) -> LayoutState {
    let state = LayoutState {
        columns_auto: auto,
        ..state
    };
    match (auto, state.viewport) {
        (true, Some(viewport)) => resize(state, viewport, len),
        _ => state,
    }
}

/// Toggle automatic rows, with the same recompute rule as columns.
pub fn set_rows_auto(state: LayoutState, auto: bool, len: usize) -> LayoutState {
    let state = LayoutState {
        rows_auto: auto,
        ..state
    };
    match (auto, state.viewport) {
        (true, Some(viewport)) => resize(state, viewport, len),
        _ => state,
    }
}

/// Change the offset base (clamped to `2..=36`) and re-derive label width.
pub fn set_offset_base(state: LayoutState, base: u32, len: usize) -> LayoutState {
    refit_offsets(
        LayoutState {
            offset_base: clamp_offset_base(base),
            ..state
        },
        len,
    )
}

/// Re-derive label width for a buffer of a new length. Auto columns are
/// refitted too, since a wider label leaves less room for bytes.
pub fn refit_offsets(state: LayoutState, len: usize) -> LayoutState {
    match (state.columns_auto, state.viewport) {
        (true, Some(viewport)) => resize(state, viewport, len),
        _ => LayoutState {
            offset_digit_width: offset_digit_width(state.narrow, len, state.offset_base),
            ..state
        },
    }
}
