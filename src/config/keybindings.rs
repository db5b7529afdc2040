//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::KeyEvent;
use std::collections::HashMap;

/// Maps keyboard events to domain actions while the grid has focus.
///
/// Provides default vim-style bindings alongside the arrow and paging keys.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&key).copied()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        use crossterm::event::{KeyCode, KeyModifiers};

        let mut bindings = HashMap::new();
        let mut bind = |code: KeyCode, modifiers: KeyModifiers, action: KeyAction| {
            bindings.insert(KeyEvent::new(code, modifiers), action);
        };

        // Vim-style cursor movement
        bind(KeyCode::Char('h'), KeyModifiers::NONE, KeyAction::CursorLeft);
        bind(KeyCode::Char('l'), KeyModifiers::NONE, KeyAction::CursorRight);
        bind(KeyCode::Char('k'), KeyModifiers::NONE, KeyAction::CursorUp);
        bind(KeyCode::Char('j'), KeyModifiers::NONE, KeyAction::CursorDown);
        bind(KeyCode::Char('g'), KeyModifiers::NONE, KeyAction::CursorHome);
        bind(KeyCode::Char('G'), KeyModifiers::SHIFT, KeyAction::CursorEnd);

        // Arrow keys
        bind(KeyCode::Left, KeyModifiers::NONE, KeyAction::CursorLeft);
        bind(KeyCode::Right, KeyModifiers::NONE, KeyAction::CursorRight);
        bind(KeyCode::Up, KeyModifiers::NONE, KeyAction::CursorUp);
        bind(KeyCode::Down, KeyModifiers::NONE, KeyAction::CursorDown);
        bind(KeyCode::Home, KeyModifiers::NONE, KeyAction::CursorHome);
        bind(KeyCode::End, KeyModifiers::NONE, KeyAction::CursorEnd);

        // Page navigation
        bind(KeyCode::PageUp, KeyModifiers::NONE, KeyAction::CursorPageUp);
        bind(KeyCode::PageDown, KeyModifiers::NONE, KeyAction::CursorPageDown);
        bind(KeyCode::Char('u'), KeyModifiers::CONTROL, KeyAction::CursorPageUp);
        bind(KeyCode::Char('d'), KeyModifiers::CONTROL, KeyAction::CursorPageDown);

        // Scrolling without moving the cursor
        bind(KeyCode::Char('y'), KeyModifiers::CONTROL, KeyAction::ScrollUp);
        bind(KeyCode::Char('e'), KeyModifiers::CONTROL, KeyAction::ScrollDown);

        // Search
        bind(KeyCode::Char('/'), KeyModifiers::NONE, KeyAction::FocusSearch);
        bind(KeyCode::Char('n'), KeyModifiers::NONE, KeyAction::NextMatch);
        bind(KeyCode::Char('N'), KeyModifiers::SHIFT, KeyAction::PrevMatch);
        bind(KeyCode::Char('m'), KeyModifiers::NONE, KeyAction::CycleQueryMode);

        // Selection and folding
        bind(KeyCode::Esc, KeyModifiers::NONE, KeyAction::ClearSelection);
        bind(KeyCode::Char('z'), KeyModifiers::NONE, KeyAction::ToggleFolding);

        // Settings
        bind(KeyCode::Char('+'), KeyModifiers::NONE, KeyAction::ColumnsIncrease);
        bind(KeyCode::Char('+'), KeyModifiers::SHIFT, KeyAction::ColumnsIncrease);
        bind(KeyCode::Char('-'), KeyModifiers::NONE, KeyAction::ColumnsDecrease);
        bind(KeyCode::Char('a'), KeyModifiers::NONE, KeyAction::ToggleAutoColumns);
        bind(KeyCode::Char('b'), KeyModifiers::NONE, KeyAction::CycleOffsetBase);
        bind(KeyCode::Char('H'), KeyModifiers::SHIFT, KeyAction::ToggleShowLastHistory);

        // Application controls
        bind(KeyCode::Char('s'), KeyModifiers::NONE, KeyAction::ShareLocation);
        bind(KeyCode::Char('q'), KeyModifiers::NONE, KeyAction::Quit);
        bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit);

        Self { bindings }
    }
}
