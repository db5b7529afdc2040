//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to key bindings while the grid has focus.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
/// Keys typed into the focused search bar are not routed through here; the
/// search bar consumes them as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Cursor movement
    /// Move the cursor one byte left. Default: h/←
    CursorLeft,
    /// Move the cursor one byte right. Default: l/→
    CursorRight,
    /// Move the cursor one row up. Default: k/↑
    CursorUp,
    /// Move the cursor one row down. Default: j/↓
    CursorDown,
    /// Move the cursor one page up. Default: Page Up/Ctrl+u
    CursorPageUp,
    /// Move the cursor one page down. Default: Page Down/Ctrl+d
    CursorPageDown,
    /// Jump to the first byte. Default: g/Home
    CursorHome,
    /// Jump to the last byte. Default: G/End
    CursorEnd,

    // Scrolling without moving the cursor
    /// Scroll the grid up by one row. Default: Ctrl+y
    ScrollUp,
    /// Scroll the grid down by one row. Default: Ctrl+e
    ScrollDown,

    // Search
    /// Focus the search bar. Default: /
    FocusSearch,
    /// Select the next match and move the cursor to it. Default: n
    NextMatch,
    /// Select the previous match and move the cursor to it. Default: N
    PrevMatch,
    /// Cycle query mode Hex → Text → Offset. Default: m
    CycleQueryMode,

    // Selection and folding
    /// Drop the current selection and cursor. Default: Esc
    ClearSelection,
    /// Toggle folding of repeated rows. Default: z
    ToggleFolding,

    // Settings
    /// Add one byte column (switches columns to manual). Default: +
    ColumnsIncrease,
    /// Remove one byte column (switches columns to manual). Default: -
    ColumnsDecrease,
    /// Toggle automatic column sizing. Default: a
    ToggleAutoColumns,
    /// Cycle the offset base 16 → 10 → 8 → 2. Default: b
    CycleOffsetBase,
    /// Toggle restoring the last history value on load. Default: H
    ToggleShowLastHistory,

    // Application
    /// Encode the current location into the status bar. Default: s
    ShareLocation,
    /// Exit the application. Default: q/Ctrl+c
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn key_actions_are_hashable_and_distinct() {
        let set: HashSet<KeyAction> = [
            KeyAction::CursorUp,
            KeyAction::CursorDown,
            KeyAction::NextMatch,
            KeyAction::PrevMatch,
            KeyAction::CursorUp,
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 4, "duplicate CursorUp should collapse");
    }

    #[test]
    fn next_and_prev_match_differ() {
        assert_ne!(KeyAction::NextMatch, KeyAction::PrevMatch);
    }

    #[test]
    fn copy_equals_original() {
        let action = KeyAction::ToggleFolding;
        let copied = action;
        assert_eq!(action, copied);
    }
}
