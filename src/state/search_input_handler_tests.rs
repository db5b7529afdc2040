//! Tests for search bar editing.

use super::*;

fn typed(text: &str, caret: usize) -> SearchState {
    SearchState {
        raw_input: text.to_string(),
        caret,
        ..SearchState::default()
    }
}

// ===== insert =====

#[test]
fn insert_at_end_appends() {
    let state = handle_char_input(typed("ab", 2), 'c');
    assert_eq!(state.raw_input, "abc");
    assert_eq!(state.caret, 3);
}

#[test]
fn insert_in_middle() {
    let state = handle_char_input(typed("ac", 1), 'b');
    assert_eq!(state.raw_input, "abc");
    assert_eq!(state.caret, 2);
}

#[test]
fn insert_after_multibyte_char() {
    let state = handle_char_input(typed("é", 1), 'x');
    assert_eq!(state.raw_input, "éx");
    assert_eq!(state.caret, 2);
}

// ===== backspace / delete =====

#[test]
fn backspace_removes_char_before_caret() {
    let state = handle_backspace(typed("abc", 2));
    assert_eq!(state.raw_input, "ac");
    assert_eq!(state.caret, 1);
}

#[test]
fn backspace_at_start_is_noop() {
    let state = handle_backspace(typed("abc", 0));
    assert_eq!(state.raw_input, "abc");
    assert_eq!(state.caret, 0);
}

#[test]
fn backspace_multibyte() {
    let state = handle_backspace(typed("aéb", 2));
    assert_eq!(state.raw_input, "ab");
    assert_eq!(state.caret, 1);
}

#[test]
fn delete_removes_char_under_caret() {
    let state = handle_delete(typed("abc", 0));
    assert_eq!(state.raw_input, "bc");
    assert_eq!(state.caret, 0);
}

#[test]
fn delete_at_end_is_noop() {
    let state = handle_delete(typed("abc", 3));
    assert_eq!(state.raw_input, "abc");
}

// ===== caret =====

#[test]
fn caret_left_saturates() {
    assert_eq!(handle_caret_left(typed("a", 0)).caret, 0);
    assert_eq!(handle_caret_left(typed("ab", 2)).caret, 1);
}

#[test]
fn caret_right_saturates_at_length() {
    assert_eq!(handle_caret_right(typed("ab", 2)).caret, 2);
    assert_eq!(handle_caret_right(typed("ab", 0)).caret, 1);
}

#[test]
fn home_and_end() {
    assert_eq!(apply_edit(typed("abc", 2), SearchEdit::CaretHome).caret, 0);
    assert_eq!(apply_edit(typed("abc", 0), SearchEdit::CaretEnd).caret, 3);
}

#[test]
fn replace_moves_caret_to_end() {
    let state = apply_edit(typed("old", 1), SearchEdit::Replace("41 42".into()));
    assert_eq!(state.raw_input, "41 42");
    assert_eq!(state.caret, 5);
}

#[test]
fn edits_leave_results_untouched() {
    let state = SearchState {
        matches: vec![1, 2],
        selected: Some(1),
        ..typed("a", 1)
    };
    let state = apply_edit(state, SearchEdit::Insert('b'));
    assert_eq!(state.matches, vec![1, 2]);
    assert_eq!(state.selected, Some(1));
}
