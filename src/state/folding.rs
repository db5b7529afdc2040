//! Row folding.
//!
//! Collapses runs of grid rows into a single placeholder. The renderer
//! indexes visible rows through the row map to find the buffer row behind
//! each one and whether it is a placeholder.

use crate::model::ByteBuffer;

/// Inclusive range of buffer rows that may be collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldRegion {
    /// First row of the region; stays visible when folded.
    pub start_row: usize,
    /// Last row of the region.
    pub end_row: usize,
}

/// How a visible row is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// A real buffer row.
    Show,
    /// Placeholder standing in for the hidden rows of a region.
    Hide,
}

/// One visible row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMapEntry {
    /// Buffer row rendered here. For a placeholder, the first hidden row.
    pub buffer_row: usize,
    /// Real row or placeholder.
    pub kind: RowKind,
}

/// Where the region list came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegionSource {
    /// Computed from the buffer; recomputed when the column count changes.
    #[default]
    Detected,
    /// Supplied by the host; kept as given.
    External,
}

/// Folding state. `row_map` is only populated while `active`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldingState {
    /// Whether folding is applied.
    pub active: bool,
    /// Foldable regions, kept while inactive.
    pub regions: Vec<FoldRegion>,
    /// Origin of `regions`.
    pub source: RegionSource,
    /// One entry per visible row while active.
    pub row_map: Vec<RowMapEntry>,
}

impl FoldingState {
    /// Number of visible rows for a grid of `total_rows` buffer rows.
    pub fn visible_rows(&self, total_rows: usize) -> usize {
        if self.active {
            self.row_map.len()
        } else {
            total_rows
        }
    }

    /// Entry for visible row `visible_row`. Identity mapping while inactive.
    pub fn row_at(&self, visible_row: usize, total_rows: usize) -> Option<RowMapEntry> {
        if self.active {
            self.row_map.get(visible_row).copied()
        } else if visible_row < total_rows {
            Some(RowMapEntry {
                buffer_row: visible_row,
                kind: RowKind::Show,
            })
        } else {
            None
        }
    }

    /// Visible row holding `buffer_row`. Hidden rows map to their placeholder.
    pub fn visible_row_of(&self, buffer_row: usize) -> usize {
        if !self.active {
            return buffer_row;
        }
        self.row_map
            .partition_point(|e| e.buffer_row <= buffer_row)
            .saturating_sub(1)
    }
}

/// Build the dense visible-row map for `regions` over `total_rows` rows.
///
/// Each region with more than one row keeps its first row and replaces the
/// rest with a single placeholder. Regions are sorted; overlaps with an
/// earlier region and rows past the end are dropped.
pub fn build_row_map(regions: &[FoldRegion], total_rows: usize) -> Vec<RowMapEntry> {
    let mut sorted: Vec<FoldRegion> = regions
        .iter()
        .filter(|r| r.start_row < total_rows)
        .map(|r| FoldRegion {
            start_row: r.start_row,
            end_row: r.end_row.min(total_rows.saturating_sub(1)),
        })
        .filter(|r| r.end_row > r.start_row)
        .collect();
    sorted.sort_by_key(|r| r.start_row);

    let mut map = Vec::with_capacity(total_rows);
    let mut row = 0;
    for region in sorted {
        if region.start_row < row {
            continue;
        }
        map.extend((row..=region.start_row).map(|buffer_row| RowMapEntry {
            buffer_row,
            kind: RowKind::Show,
        }));
        map.push(RowMapEntry {
            buffer_row: region.start_row + 1,
            kind: RowKind::Hide,
        });
        row = region.end_row + 1;
    }
    map.extend((row..total_rows).map(|buffer_row| RowMapEntry {
        buffer_row,
        kind: RowKind::Show,
    }));
    map
}

/// Regions covering each run of two or more consecutive identical full rows.
pub fn detect_identical_rows(buffer: &ByteBuffer, columns: usize) -> Vec<FoldRegion> {
    if columns == 0 {
        return Vec::new();
    }
    let full_rows = buffer.len() / columns;
    let mut regions = Vec::new();
    let mut run_start = 0;
    for row in 1..=full_rows {
        let continues =
            row < full_rows && buffer.row(row, columns) == buffer.row(run_start, columns);
        if !continues {
            if row - run_start >= 2 {
                regions.push(FoldRegion {
                    start_row: run_start,
                    end_row: row - 1,
                });
            }
            run_start = row;
        }
    }
    regions
}

/// Switch folding on or off. The region list is kept either way.
pub fn set_active(state: FoldingState, active: bool, total_rows: usize) -> FoldingState {
    let row_map = if active {
        build_row_map(&state.regions, total_rows)
    } else {
        Vec::new()
    };
    FoldingState {
        active,
        row_map,
        ..state
    }
}

/// Install host-supplied regions.
pub fn set_regions(state: FoldingState, regions: Vec<FoldRegion>, total_rows: usize) -> FoldingState {
    let active = state.active;
    set_active(
        FoldingState {
            regions,
            source: RegionSource::External,
            ..state
        },
        active,
        total_rows,
    )
}

/// Re-derive regions after the buffer or column count changed.
///
/// Detected regions are recomputed; external ones are only re-clamped.
pub fn refresh(state: FoldingState, buffer: &ByteBuffer, columns: usize) -> FoldingState {
    let total_rows = buffer.row_count(columns);
    let regions = match state.source {
        RegionSource::Detected => detect_identical_rows(buffer, columns),
        RegionSource::External => state.regions.clone(),
    };
    let active = state.active;
    set_active(FoldingState { regions, ..state }, active, total_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(start_row: usize, end_row: usize) -> FoldRegion {
        FoldRegion { start_row, end_row }
    }

    fn rows(map: &[RowMapEntry]) -> Vec<(usize, RowKind)> {
        map.iter().map(|e| (e.buffer_row, e.kind)).collect()
    }

    #[test]
    fn region_collapses_to_show_plus_placeholder() {
        let map = build_row_map(&[region(2, 5)], 8);
        assert_eq!(
            rows(&map),
            vec![
                (0, RowKind::Show),
                (1, RowKind::Show),
                (2, RowKind::Show),
                (3, RowKind::Hide),
                (6, RowKind::Show),
                (7, RowKind::Show),
            ]
        );
    }

    #[test]
    fn single_row_regions_are_ignored() {
        assert_eq!(build_row_map(&[region(3, 3)], 5).len(), 5);
    }

    #[test]
    fn overlapping_regions_keep_the_first() {
        let map = build_row_map(&[region(4, 6), region(1, 5)], 8);
        // 0, 1, placeholder(2..=5), 6, 7
        assert_eq!(map.len(), 5);
        assert_eq!(map[2].kind, RowKind::Hide);
    }

    #[test]
    fn regions_clamp_to_row_count() {
        let map = build_row_map(&[region(1, 100)], 4);
        assert_eq!(rows(&map), vec![(0, RowKind::Show), (1, RowKind::Show), (2, RowKind::Hide)]);
    }

    #[test]
    fn toggle_off_restores_identity_and_keeps_regions() {
        let state = set_regions(FoldingState::default(), vec![region(0, 3)], 6);
        let on = set_active(state, true, 6);
        let off = set_active(on.clone(), false, 6);
        assert_eq!(off.visible_rows(6), 6);
        assert_eq!(off.row_at(4, 6), Some(RowMapEntry { buffer_row: 4, kind: RowKind::Show }));
        assert_eq!(off.regions, vec![region(0, 3)]);
        assert_eq!(set_active(off, true, 6), on);
    }

    #[test]
    fn visible_row_of_maps_hidden_rows_to_placeholder() {
        let state = set_active(
            set_regions(FoldingState::default(), vec![region(2, 5)], 8),
            true,
            8,
        );
        assert_eq!(state.visible_row_of(2), 2);
        assert_eq!(state.visible_row_of(4), 3);
        assert_eq!(state.visible_row_of(6), 4);
    }

    #[test]
    fn detects_runs_of_identical_full_rows() {
        let mut bytes = vec![1u8; 4];
        bytes.extend([0u8; 12]);
        bytes.extend([2u8, 3, 4, 5]);
        bytes.extend([0u8; 2]);
        let regions = detect_identical_rows(&ByteBuffer::from(bytes), 4);
        assert_eq!(regions, vec![region(1, 3)]);
    }

    #[test]
    fn detect_ignores_partial_last_row() {
        let regions = detect_identical_rows(&ByteBuffer::from(vec![0u8; 6]), 4);
        assert!(regions.is_empty());
    }

    #[test]
    fn refresh_recomputes_detected_regions_for_new_columns() {
        let buffer = ByteBuffer::from(vec![0u8; 16]);
        let state = set_active(FoldingState::default(), true, 0);
        let state = refresh(state, &buffer, 4);
        assert_eq!(state.regions, vec![region(0, 3)]);
        let state = refresh(state, &buffer, 8);
        assert_eq!(state.regions, vec![region(0, 1)]);
        assert_eq!(state.row_map.len(), 2);
    }
}
