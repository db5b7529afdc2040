//! Search bar text editing (pure state transitions).
//!
//! Edits `raw_input` and the caret of a [`SearchState`]. The caret counts
//! chars, so multi-byte input edits cleanly. None of these functions touch
//! results; the reducer decides whether an edit invalidates them.

use crate::state::search::SearchState;

/// A single edit applied to the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEdit {
    /// Insert a char at the caret.
    Insert(char),
    /// Delete the char before the caret.
    Backspace,
    /// Delete the char under the caret.
    Delete,
    /// Move the caret one char left.
    CaretLeft,
    /// Move the caret one char right.
    CaretRight,
    /// Move the caret to the start.
    CaretHome,
    /// Move the caret to the end.
    CaretEnd,
    /// Replace the whole input, caret at the end.
    Replace(String),
}

/// Apply an edit. Returns the new state.
pub fn apply_edit(state: SearchState, edit: SearchEdit) -> SearchState {
    match edit {
        SearchEdit::Insert(ch) => handle_char_input(state, ch),
        SearchEdit::Backspace => handle_backspace(state),
        SearchEdit::Delete => handle_delete(state),
        SearchEdit::CaretLeft => handle_caret_left(state),
        SearchEdit::CaretRight => handle_caret_right(state),
        SearchEdit::CaretHome => SearchState { caret: 0, ..state },
        SearchEdit::CaretEnd => {
            let caret = state.raw_input.chars().count();
            SearchState { caret, ..state }
        }
        SearchEdit::Replace(text) => {
            let caret = text.chars().count();
            SearchState {
                raw_input: text,
                caret,
                ..state
            }
        }
    }
}

/// Byte position of the char at `caret`, or the input length past the end.
fn byte_index(input: &str, caret: usize) -> usize {
    input
        .char_indices()
        .nth(caret)
        .map_or(input.len(), |(i, _)| i)
}

/// Insert a character at the caret and advance it.
pub fn handle_char_input(state: SearchState, ch: char) -> SearchState {
    let mut raw_input = state.raw_input;
    let caret = state.caret.min(raw_input.chars().count());
    raw_input.insert(byte_index(&raw_input, caret), ch);
    SearchState {
        raw_input,
        caret: caret + 1,
        ..state
    }
}

/// Delete the character before the caret. No-op at the start.
pub fn handle_backspace(state: SearchState) -> SearchState {
    let caret = state.caret.min(state.raw_input.chars().count());
    if caret == 0 {
        return state;
    }
    let mut raw_input = state.raw_input;
    raw_input.remove(byte_index(&raw_input, caret - 1));
    SearchState {
        raw_input,
        caret: caret - 1,
        ..state
    }
}

/// Delete the character under the caret. No-op at the end.
pub fn handle_delete(state: SearchState) -> SearchState {
    let len = state.raw_input.chars().count();
    if state.caret >= len {
        return state;
    }
    let mut raw_input = state.raw_input;
    raw_input.remove(byte_index(&raw_input, state.caret));
    SearchState { raw_input, ..state }
}

/// Move the caret left. Saturates at 0.
pub fn handle_caret_left(state: SearchState) -> SearchState {
    SearchState {
        caret: state.caret.saturating_sub(1),
        ..state
    }
}

/// Move the caret right. Saturates at the input length.
pub fn handle_caret_right(state: SearchState) -> SearchState {
    let max_caret = state.raw_input.chars().count();
    SearchState {
        caret: (state.caret + 1).min(max_caret),
        ..state
    }
}

#[cfg(test)]
#[path = "search_input_handler_tests.rs"]
mod tests;
