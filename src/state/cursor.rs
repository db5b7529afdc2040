//! Cursor controller (pure state transitions).
//!
//! Tracks the single focused byte index. Every transition clamps into the
//! bounds of the buffer it is given; an empty buffer never holds a cursor.

use crate::model::ByteBuffer;

/// Single focused byte index. `None` means no cursor has been placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorState {
    /// Focused byte, always `< N` when set.
    pub index: Option<usize>,
}

/// Keyboard motions understood by the cursor controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMotion {
    /// One byte back.
    Left,
    /// One byte forward.
    Right,
    /// One row back (`columns` bytes).
    Up,
    /// One row forward (`columns` bytes).
    Down,
    /// One page back (`columns * rows` bytes).
    PageUp,
    /// One page forward (`columns * rows` bytes).
    PageDown,
    /// First byte.
    Home,
    /// Last byte.
    End,
}

impl CursorMotion {
    /// Signed byte delta of a relative motion, `None` for absolute motions.
    pub fn delta(self, columns: usize, rows: usize) -> Option<i64> {
        let columns = columns.max(1) as i64;
        let page = columns.saturating_mul(rows.max(1) as i64);
        match self {
            CursorMotion::Left => Some(-1),
            CursorMotion::Right => Some(1),
            CursorMotion::Up => Some(-columns),
            CursorMotion::Down => Some(columns),
            CursorMotion::PageUp => Some(-page),
            CursorMotion::PageDown => Some(page),
            CursorMotion::Home | CursorMotion::End => None,
        }
    }
}

/// Move the cursor by `delta` bytes, clamped to `[0, N-1]`.
///
/// A missing cursor is placed at index 0 instead of moving.
pub fn move_by(cursor: CursorState, delta: i64, buffer: &ByteBuffer) -> CursorState {
    let index = match cursor.index {
        Some(current) => buffer.clamp_index((current as i64).saturating_add(delta)),
        None => buffer.clamp_index(0),
    };
    CursorState { index }
}

/// Apply a keyboard motion using the current grid geometry.
pub fn apply_motion(
    cursor: CursorState,
    motion: CursorMotion,
    columns: usize,
    rows: usize,
    buffer: &ByteBuffer,
) -> CursorState {
    match motion.delta(columns, rows) {
        Some(delta) => move_by(cursor, delta, buffer),
        None if motion == CursorMotion::Home => set_index(cursor, 0, buffer),
        None => set_index(cursor, i64::MAX, buffer),
    }
}

/// Jump to an explicit index, clamped into bounds.
pub fn set_index(_cursor: CursorState, index: i64, buffer: &ByteBuffer) -> CursorState {
    CursorState {
        index: buffer.clamp_index(index),
    }
}

/// Remove the cursor.
pub fn clear(_cursor: CursorState) -> CursorState {
    CursorState::default()
}
