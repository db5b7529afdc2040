//! Selection controller (pure state transitions).
//!
//! A selection is an inclusive byte range driven either by a pointer drag or
//! by a programmatic range set. It is independent of the cursor.

use crate::model::ByteBuffer;
use std::ops::RangeInclusive;

/// Active selection, normalized so `start <= end`. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    /// First selected byte.
    pub start: usize,
    /// Last selected byte.
    pub end: usize,
}

impl SelectionRange {
    /// Build a normalized range from two endpoints in any order.
    pub fn between(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Number of selected bytes.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false; a range holds at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True when `index` lies inside the range.
    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }
}

/// In-progress pointer drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    /// Byte where the drag began.
    pub anchor: usize,
    /// Byte currently under the pointer.
    pub hover: usize,
}

/// Selection controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Committed or in-progress range. `None` means no selection.
    pub range: Option<SelectionRange>,
    /// Present while the pointer button is held.
    pub drag: Option<DragState>,
}

/// Start a drag at `index`, dropping any prior range.
pub fn begin_drag(_state: SelectionState, index: usize, buffer: &ByteBuffer) -> SelectionState {
    let drag = buffer.clamp_index(index as i64).map(|i| DragState {
        anchor: i,
        hover: i,
    });
    SelectionState { range: None, drag }
}

/// Move the hover end of an active drag. No-op when not dragging.
pub fn update_hover(state: SelectionState, index: usize, buffer: &ByteBuffer) -> SelectionState {
    let (Some(drag), Some(hover)) = (state.drag, buffer.clamp_index(index as i64)) else {
        return state;
    };
    SelectionState {
        range: Some(SelectionRange::between(drag.anchor, hover)),
        drag: Some(DragState {
            anchor: drag.anchor,
            hover,
        }),
    }
}

/// Finish a drag. A drag that never left its anchor is a click and clears
/// the selection instead of committing a one-byte range.
pub fn end_drag(state: SelectionState) -> SelectionState {
    match state.drag {
        Some(drag) if drag.hover == drag.anchor => SelectionState::default(),
        Some(drag) => SelectionState {
            range: Some(SelectionRange::between(drag.anchor, drag.hover)),
            drag: None,
        },
        None => state,
    }
}

/// Programmatic range set. Each end is clamped into `[0, N)` independently.
pub fn set_range(_state: SelectionState, start: i64, end: i64, buffer: &ByteBuffer) -> SelectionState {
    let range = match (buffer.clamp_index(start), buffer.clamp_index(end)) {
        (Some(a), Some(b)) => Some(SelectionRange::between(a, b)),
        _ => None,
    };
    SelectionState { range, drag: None }
}

/// Drop the selection and any drag.
pub fn clear(_state: SelectionState) -> SelectionState {
    SelectionState::default()
}

/// Byte ranges whose selection membership changes when the hover of a drag
/// anchored at `anchor` moves from `old_hover` to `new_hover`.
///
/// The result covers exactly the symmetric difference of the two selections,
/// so its total size is bounded by the distance moved plus the distance
/// across the anchor when the drag flips sides.
pub fn selection_delta(
    anchor: usize,
    old_hover: usize,
    new_hover: usize,
) -> Vec<RangeInclusive<usize>> {
    let mut changed = Vec::new();
    if old_hover == new_hover {
        return changed;
    }

    // Left of the anchor: selected bytes form [lo, anchor - 1].
    let (old_lo, new_lo) = (old_hover.min(anchor), new_hover.min(anchor));
    if old_lo != new_lo {
        changed.push(old_lo.min(new_lo)..=old_lo.max(new_lo) - 1);
    }

    // Right of the anchor: selected bytes form [anchor + 1, hi].
    let (old_hi, new_hi) = (old_hover.max(anchor), new_hover.max(anchor));
    if old_hi != new_hi {
        changed.push(old_hi.min(new_hi) + 1..=old_hi.max(new_hi));
    }

    changed
}
