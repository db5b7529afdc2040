//! Query history (pure state transitions).
//!
//! Most-recent-first list of committed queries, capped and de-duplicated.
//! Browsing moves a read cursor without mutating the list.

use crate::state::search::QueryMode;
use serde::{Deserialize, Serialize};

/// Default number of retained entries.
pub const DEFAULT_MAX_SIZE: usize = 10;

/// One committed query.
///
/// Serializes as `{"type": "hex" | "text" | "cursor", "value": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum HistoryEntry {
    /// Hex query, as typed.
    Hex(String),
    /// Text query, as typed.
    Text(String),
    /// Offset jump, stored as the resolved byte index.
    #[serde(rename = "cursor")]
    CursorJump(u64),
}

impl HistoryEntry {
    /// Query mode this entry restores.
    pub fn mode(&self) -> QueryMode {
        match self {
            HistoryEntry::Hex(_) => QueryMode::Hex,
            HistoryEntry::Text(_) => QueryMode::Text,
            HistoryEntry::CursorJump(_) => QueryMode::Offset,
        }
    }

    /// Build an entry for a search-bar query. Offset input is not a valid
    /// search entry; use [`HistoryEntry::CursorJump`] with the resolved index.
    pub fn from_query(mode: QueryMode, raw_input: &str) -> Option<Self> {
        if raw_input.is_empty() {
            return None;
        }
        match mode {
            QueryMode::Hex => Some(HistoryEntry::Hex(raw_input.to_string())),
            QueryMode::Text => Some(HistoryEntry::Text(raw_input.to_string())),
            QueryMode::Offset => None,
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            HistoryEntry::Hex(v) | HistoryEntry::Text(v) => v.is_empty(),
            HistoryEntry::CursorJump(_) => false,
        }
    }
}

/// Direction of history browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    /// Towards older entries (arrow up).
    Older,
    /// Towards newer entries (arrow down).
    Newer,
}

/// History list plus browsing cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryState {
    /// Entries, most recent first.
    pub entries: Vec<HistoryEntry>,
    /// Cap on `entries`.
    pub max_size: usize,
    /// Position while browsing. `None` when not browsing.
    pub read_cursor: Option<usize>,
    /// Restore the most recent search entry when history is loaded.
    pub show_last_value: bool,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            max_size: DEFAULT_MAX_SIZE,
            read_cursor: None,
            show_last_value: false,
        }
    }
}

impl HistoryState {
    /// Entry under the read cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.read_cursor.and_then(|i| self.entries.get(i))
    }

    /// Most recent Hex or Text entry.
    pub fn last_search(&self) -> Option<&HistoryEntry> {
        self.entries
            .iter()
            .find(|e| !matches!(e, HistoryEntry::CursorJump(_)))
    }
}

/// Replace the list with persisted entries, truncated to the cap.
pub fn load_entries(state: HistoryState, mut entries: Vec<HistoryEntry>) -> HistoryState {
    entries.retain(|e| !e.is_empty());
    entries.truncate(state.max_size);
    HistoryState {
        entries,
        read_cursor: None,
        ..state
    }
}

/// Prepend `entry` unless it is empty or equal to the most recent entry of
/// the same mode. Truncates to the cap and stops browsing either way.
///
/// Returns the new state and whether the list changed.
pub fn commit_if_changed(state: HistoryState, entry: HistoryEntry) -> (HistoryState, bool) {
    let duplicate = state
        .entries
        .iter()
        .find(|e| e.mode() == entry.mode())
        .is_some_and(|last| *last == entry);

    if entry.is_empty() || duplicate || state.max_size == 0 {
        return (
            HistoryState {
                read_cursor: None,
                ..state
            },
            false,
        );
    }

    let mut entries = Vec::with_capacity(state.max_size);
    entries.push(entry);
    entries.extend(state.entries);
    entries.truncate(state.max_size);
    (
        HistoryState {
            entries,
            read_cursor: None,
            ..state
        },
        true,
    )
}

/// Move the read cursor, clamped to `[0, len-1]`. The list is untouched.
pub fn navigate(state: HistoryState, direction: HistoryDirection) -> HistoryState {
    if state.entries.is_empty() {
        return state;
    }
    let last = state.entries.len() - 1;
    let read_cursor = match (state.read_cursor, direction) {
        (None, HistoryDirection::Older) => Some(0),
        (None, HistoryDirection::Newer) => None,
        (Some(i), HistoryDirection::Older) => Some((i + 1).min(last)),
        (Some(i), HistoryDirection::Newer) => Some(i.saturating_sub(1).min(last)),
    };
    HistoryState {
        read_cursor,
        ..state
    }
}
