//! Actions accepted by the reducer and effects it requests.

use crate::model::ByteBuffer;
use crate::state::cursor::CursorMotion;
use crate::state::folding::FoldRegion;
use crate::state::history::{HistoryDirection, HistoryEntry};
use crate::state::layout::Viewport;
use crate::state::location::Location;
use crate::state::scroll::ScrollMotion;
use crate::state::search::QueryMode;
use crate::state::search_input_handler::SearchEdit;
use crate::state::settings::Settings;
use crate::state::viewer_state::ViewerState;

/// Arrow keys, routed by focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKey {
    /// ←
    Left,
    /// →
    Right,
    /// ↑
    Up,
    /// ↓
    Down,
}

/// Every state change the viewer understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Document
    /// Replace the buffer; resets everything but history and settings.
    LoadBuffer(ByteBuffer),

    // Keyboard routing
    /// Arrow key; moves the cursor or, in the focused search bar, browses
    /// history (up/down) or moves the caret (left/right).
    ArrowKey(ArrowKey),
    /// Focus the search bar.
    FocusSearch,
    /// Return focus to the grid.
    FocusGrid,

    // Cursor
    /// Keyboard cursor motion.
    CursorMove(CursorMotion),
    /// Jump to an index (clamped).
    CursorSet {
        /// Target byte; out-of-range values clamp.
        index: i64,
    },
    /// Remove the cursor.
    CursorClear,

    // Pointer
    /// Button pressed over a byte: places the cursor and starts a drag.
    PointerDown {
        /// Byte under the pointer.
        index: usize,
    },
    /// Pointer moved onto a byte.
    PointerEnter {
        /// Byte under the pointer.
        index: usize,
    },
    /// Button released.
    PointerUp,

    // Selection
    /// Programmatic selection; both ends clamp.
    SelectRange {
        /// One end.
        start: i64,
        /// Other end.
        end: i64,
    },
    /// Drop the selection.
    SelectionClear,

    // Search
    /// Edit the search input.
    SearchInput(SearchEdit),
    /// Switch query mode, committing the pending input first.
    SearchModeChange(QueryMode),
    /// Enter in the search bar; Shift+Enter goes backwards.
    SearchEnterKey {
        /// Shift held.
        shift: bool,
    },
    /// Escape in the search bar.
    SearchEscapeKey,
    /// Clear button.
    SearchClear,
    /// Next match.
    SearchNext,
    /// Previous match.
    SearchPrevious,
    /// The debounce armed for `token` ran out.
    SearchDebounceElapsed {
        /// Token from the matching [`Effect::ScheduleSearch`].
        token: u64,
    },

    // History
    /// Persisted history read at session start.
    HistoryLoaded(Vec<HistoryEntry>),
    /// Browse history.
    HistoryNavigate(HistoryDirection),

    // Layout and settings
    /// Persisted settings read at session start.
    SettingsLoaded(Settings),
    /// Viewport measured.
    LayoutResize(Viewport),
    /// Manual column count.
    SetColumns(usize),
    /// Manual row count.
    SetRows(usize),
    /// Automatic columns on/off.
    SetColumnsAuto(bool),
    /// Automatic rows on/off.
    SetRowsAuto(bool),
    /// Offset label base.
    SetOffsetBase(u32),
    /// Restore the last search on load.
    SetShowHistoryLastValue(bool),

    // Folding
    /// Folding on/off.
    FoldingSetActive(bool),
    /// Flip folding.
    FoldingToggle,
    /// Host-supplied fold regions.
    FoldingSetRegions(Vec<FoldRegion>),
    /// Fold runs of identical rows.
    FoldingDetect,

    // Scroll
    /// Scroll without moving the cursor.
    Scroll(ScrollMotion),
    /// Scroll minimally so `index` is visible.
    ScrollIntoView {
        /// Byte to reveal.
        index: usize,
    },

    // Location
    /// Hydrate from a shared location; only the first call per session applies.
    LocationInit(Location),
}

/// Side effect requested by a transition, applied in order by the shell
/// after the new snapshot is committed.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Arm the search debounce for `token`, replacing any pending one.
    ScheduleSearch {
        /// Request token to echo back in [`Action::SearchDebounceElapsed`].
        token: u64,
    },
    /// Disarm any pending search debounce.
    CancelSearch,
    /// Save the history list.
    PersistHistory(Vec<HistoryEntry>),
    /// Save the settings.
    PersistSettings(Settings),
    /// Dispatch [`Action::ScrollIntoView`] once the snapshot is committed.
    ScrollIntoView {
        /// Byte to reveal.
        index: usize,
    },
}

/// Result of one dispatch: the next snapshot and its ordered effects.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Next snapshot.
    pub state: ViewerState,
    /// Effects, in application order.
    pub effects: Vec<Effect>,
}

impl Transition {
    /// Transition with no effects.
    pub fn new(state: ViewerState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    /// Append an effect.
    pub fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Append an effect when present.
    pub fn with_opt(self, effect: Option<Effect>) -> Self {
        match effect {
            Some(effect) => self.with(effect),
            None => self,
        }
    }
}
