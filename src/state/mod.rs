//! Viewer state machine (pure).
//!
//! All state transitions are pure functions testable without a terminal.
//! Controllers own one slice of [`ViewerState`] each; [`dispatch`] is the only
//! place that combines them.

pub mod action;
pub mod cursor;
pub mod folding;
pub mod history;
pub mod layout;
pub mod location;
pub mod reducer;
pub mod scroll;
pub mod search;
pub mod search_input_handler;
pub mod selection;
pub mod settings;
pub mod viewer_state;

// Re-export for convenience
pub use action::{Action, ArrowKey, Effect, Transition};
pub use cursor::{CursorMotion, CursorState};
pub use folding::{FoldRegion, FoldingState, RowKind, RowMapEntry};
pub use history::{HistoryDirection, HistoryEntry, HistoryState};
pub use layout::{ColumnBreakpoint, LayoutMetrics, LayoutState, Viewport};
pub use location::Location;
pub use reducer::dispatch;
pub use scroll::{ScrollMotion, ScrollState};
pub use search::{QueryMode, SearchState};
pub use search_input_handler::SearchEdit;
pub use selection::{SelectionRange, SelectionState};
pub use settings::Settings;
pub use viewer_state::{Focus, ViewerState};
