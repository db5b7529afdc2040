//! Dispatch core.
//!
//! The single point of mutation: takes a snapshot and an action, routes the
//! action to the controller(s) that own it and returns the next snapshot with
//! the ordered effects the shell must apply. Actions that do not apply to the
//! current state return it unchanged.

use crate::model::codec::{format_offset, parse_offset};
use crate::model::ByteBuffer;
use crate::state::action::{Action, ArrowKey, Effect, Transition};
use crate::state::cursor::{self, CursorMotion};
use crate::state::folding::{self, RegionSource};
use crate::state::history::{self, HistoryDirection, HistoryEntry};
use crate::state::layout;
use crate::state::location::Location;
use crate::state::scroll;
use crate::state::search::{self, QueryMode, SearchState};
use crate::state::search_input_handler::{self, SearchEdit};
use crate::state::selection;
use crate::state::settings::Settings;
use crate::state::viewer_state::{Focus, ViewerState};
use tracing::{debug, trace};

/// Apply one action.
pub fn dispatch(state: ViewerState, action: Action) -> Transition {
    match action {
        Action::LoadBuffer(buffer) => load_buffer(state, buffer),

        Action::ArrowKey(key) => arrow_key(state, key),
        Action::FocusSearch => Transition::new(ViewerState {
            focus: Focus::SearchBar,
            ..state
        }),
        Action::FocusGrid => Transition::new(focus_grid(state)),

        Action::CursorMove(motion) => cursor_move(state, motion),
        Action::CursorSet { index } => {
            let cursor = cursor::set_index(state.cursor, index, &state.buffer);
            reveal_cursor(ViewerState { cursor, ..state })
        }
        Action::CursorClear => Transition::new(ViewerState {
            cursor: cursor::clear(state.cursor),
            ..state
        }),

        Action::PointerDown { index } => {
            let cursor = cursor::set_index(state.cursor, index as i64, &state.buffer);
            let selection = selection::begin_drag(state.selection, index, &state.buffer);
            Transition::new(ViewerState {
                cursor,
                selection,
                focus: Focus::Grid,
                ..state
            })
        }
        Action::PointerEnter { index } => {
            let selection = selection::update_hover(state.selection, index, &state.buffer);
            Transition::new(ViewerState { selection, ..state })
        }
        Action::PointerUp => Transition::new(ViewerState {
            selection: selection::end_drag(state.selection),
            ..state
        }),

        Action::SelectRange { start, end } => {
            let selection = selection::set_range(state.selection, start, end, &state.buffer);
            Transition::new(ViewerState { selection, ..state })
        }
        Action::SelectionClear => Transition::new(ViewerState {
            selection: selection::clear(state.selection),
            ..state
        }),

        Action::SearchInput(edit) => search_input(state, edit),
        Action::SearchModeChange(mode) => search_mode_change(state, mode),
        Action::SearchEnterKey { shift } => search_enter(state, shift),
        Action::SearchEscapeKey => search_escape(state),
        Action::SearchClear => clear_search(state),
        Action::SearchNext => step_match(state, MatchStep::Next),
        Action::SearchPrevious => step_match(state, MatchStep::Previous),
        Action::SearchDebounceElapsed { token } => debounce_elapsed(state, token),

        Action::HistoryLoaded(entries) => history_loaded(state, entries),
        Action::HistoryNavigate(direction) => history_navigate(state, direction),

        Action::SettingsLoaded(settings) => Transition::new(apply_settings(state, settings)),
        Action::LayoutResize(viewport) => {
            let layout = layout::resize(state.layout.clone(), viewport, state.buffer.len());
            Transition::new(relayout(state, layout))
        }
        Action::SetColumns(columns) => {
            let layout = layout::set_columns(state.layout.clone(), columns);
            settings_changed(relayout(state, layout))
        }
        Action::SetRows(rows) => {
            let layout = layout::set_rows(state.layout.clone(), rows);
            settings_changed(relayout(state, layout))
        }
        Action::SetColumnsAuto(auto) => {
            let layout = layout::set_columns_auto(state.layout.clone(), auto, state.buffer.len());
            settings_changed(relayout(state, layout))
        }
        Action::SetRowsAuto(auto) => {
            let layout = layout::set_rows_auto(state.layout.clone(), auto, state.buffer.len());
            settings_changed(relayout(state, layout))
        }
        Action::SetOffsetBase(base) => {
            let layout = layout::set_offset_base(state.layout.clone(), base, state.buffer.len());
            settings_changed(relayout(state, layout))
        }
        Action::SetShowHistoryLastValue(show) => {
            let history = history::HistoryState {
                show_last_value: show,
                ..state.history
            };
            settings_changed(ViewerState { history, ..state })
        }

        Action::FoldingSetActive(active) => Transition::new(set_folding(state, active)),
        Action::FoldingToggle => {
            let active = !state.folding.active;
            Transition::new(set_folding(state, active))
        }
        Action::FoldingSetRegions(regions) => {
            let total_rows = state.total_rows();
            let folding = folding::set_regions(state.folding, regions, total_rows);
            Transition::new(clamp_scroll(ViewerState { folding, ..state }))
        }
        Action::FoldingDetect => {
            let folding = folding::FoldingState {
                source: RegionSource::Detected,
                ..state.folding
            };
            let folding = folding::refresh(folding, &state.buffer, state.layout.columns);
            Transition::new(clamp_scroll(ViewerState { folding, ..state }))
        }

        Action::Scroll(motion) => {
            let scroll = scroll::scroll(state.scroll, motion, state.scroll_bounds());
            Transition::new(ViewerState { scroll, ..state })
        }
        Action::ScrollIntoView { index } => {
            let scroll = scroll::scroll_into_view(
                state.scroll,
                index,
                state.layout.columns,
                &state.folding,
                state.scroll_bounds(),
            );
            Transition::new(ViewerState { scroll, ..state })
        }

        Action::LocationInit(location) => location_init(state, location),
    }
}

// ===== Document =====

fn load_buffer(state: ViewerState, buffer: ByteBuffer) -> Transition {
    debug!(len = buffer.len(), "Loading new buffer");
    let layout = layout::refit_offsets(state.layout, buffer.len());
    let search = SearchState {
        mode: state.search.mode,
        request_token: state.search.request_token.wrapping_add(1),
        ..SearchState::default()
    };
    let folding = folding::FoldingState {
        active: state.folding.active,
        ..folding::FoldingState::default()
    };
    let history = history::HistoryState {
        read_cursor: None,
        ..state.history
    };
    let next = ViewerState {
        buffer,
        search,
        history,
        layout,
        folding,
        location: state.location,
        focus: state.focus,
        ..ViewerState::default()
    };
    Transition::new(next.refold()).with(Effect::CancelSearch)
}

// ===== Keyboard routing =====

fn arrow_key(state: ViewerState, key: ArrowKey) -> Transition {
    match (state.focus, key) {
        (Focus::Grid, ArrowKey::Left) => cursor_move(state, CursorMotion::Left),
        (Focus::Grid, ArrowKey::Right) => cursor_move(state, CursorMotion::Right),
        (Focus::Grid, ArrowKey::Up) => cursor_move(state, CursorMotion::Up),
        (Focus::Grid, ArrowKey::Down) => cursor_move(state, CursorMotion::Down),
        (Focus::SearchBar, ArrowKey::Left) => search_input(state, SearchEdit::CaretLeft),
        (Focus::SearchBar, ArrowKey::Right) => search_input(state, SearchEdit::CaretRight),
        (Focus::SearchBar, ArrowKey::Up) if !state.history.entries.is_empty() => {
            history_navigate(state, HistoryDirection::Older)
        }
        (Focus::SearchBar, ArrowKey::Down) if !state.history.entries.is_empty() => {
            history_navigate(state, HistoryDirection::Newer)
        }
        (Focus::SearchBar, ArrowKey::Up) => cursor_move(state, CursorMotion::Up),
        (Focus::SearchBar, ArrowKey::Down) => cursor_move(state, CursorMotion::Down),
    }
}

fn focus_grid(state: ViewerState) -> ViewerState {
    let history = history::HistoryState {
        read_cursor: None,
        ..state.history
    };
    ViewerState {
        focus: Focus::Grid,
        history,
        ..state
    }
}

// ===== Cursor =====

fn cursor_move(state: ViewerState, motion: CursorMotion) -> Transition {
    let cursor = cursor::apply_motion(
        state.cursor,
        motion,
        state.layout.columns,
        state.layout.rows,
        &state.buffer,
    );
    reveal_cursor(ViewerState { cursor, ..state })
}

fn reveal_cursor(state: ViewerState) -> Transition {
    let effect = state.cursor.index.map(|index| Effect::ScrollIntoView { index });
    Transition::new(state).with_opt(effect)
}

fn to_index(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

// ===== Search =====

fn search_input(state: ViewerState, edit: SearchEdit) -> Transition {
    let previous = state.search.raw_input.clone();
    let search = search_input_handler::apply_edit(state.search, edit);
    if search.raw_input == previous {
        return Transition::new(ViewerState { search, ..state });
    }

    let history = history::HistoryState {
        read_cursor: None,
        ..state.history
    };
    if search.raw_input.is_empty() {
        let search = search::clear_search(search);
        return Transition::new(ViewerState {
            search,
            history,
            ..state
        })
        .with(Effect::CancelSearch);
    }
    if !search.mode.scans() {
        return Transition::new(ViewerState {
            search,
            history,
            ..state
        });
    }

    let search = search::invalidate(search);
    let token = search.request_token;
    Transition::new(ViewerState {
        search,
        history,
        ..state
    })
    .with(Effect::ScheduleSearch { token })
}

fn search_mode_change(state: ViewerState, mode: QueryMode) -> Transition {
    if state.search.mode == mode {
        return Transition::new(state);
    }
    let (state, persist) = commit_pending_query(state);
    let search = SearchState {
        mode,
        ..search::clear_search(state.search)
    };
    Transition::new(ViewerState { search, ..state })
        .with_opt(persist)
        .with(Effect::CancelSearch)
}

/// Commit the current Hex/Text input to history.
fn commit_pending_query(state: ViewerState) -> (ViewerState, Option<Effect>) {
    match HistoryEntry::from_query(state.search.mode, &state.search.raw_input) {
        Some(entry) => commit_history(state, entry),
        None => (state, None),
    }
}

fn commit_history(state: ViewerState, entry: HistoryEntry) -> (ViewerState, Option<Effect>) {
    let (history, changed) = history::commit_if_changed(state.history, entry);
    let effect = changed.then(|| Effect::PersistHistory(history.entries.clone()));
    (ViewerState { history, ..state }, effect)
}

/// Re-run a stale scan synchronously. Supersedes any pending debounce.
fn ensure_fresh(state: ViewerState) -> (ViewerState, bool) {
    if !state.search.stale {
        return (state, false);
    }
    let search = search::run_search(search::invalidate(state.search), &state.buffer);
    (ViewerState { search, ..state }, true)
}

fn search_enter(state: ViewerState, shift: bool) -> Transition {
    if state.search.raw_input.is_empty() {
        return Transition::new(state);
    }
    if state.search.mode == QueryMode::Offset {
        return offset_jump(state);
    }

    let (state, persist) = commit_pending_query(state);
    let step = if shift {
        MatchStep::Previous
    } else {
        MatchStep::Land
    };
    let transition = step_match(state, step);
    let mut effects = Vec::with_capacity(transition.effects.len() + 1);
    effects.extend(persist);
    effects.extend(transition.effects);
    Transition {
        state: transition.state,
        effects,
    }
}

fn offset_jump(state: ViewerState) -> Transition {
    let Some(offset) = parse_offset(&state.search.raw_input, state.layout.offset_base) else {
        debug!(input = %state.search.raw_input, "Ignoring unparsable offset");
        return Transition::new(state);
    };
    let cursor = cursor::set_index(state.cursor, to_index(offset), &state.buffer);
    let Some(index) = cursor.index else {
        return Transition::new(state);
    };
    let (state, persist) = commit_history(
        ViewerState { cursor, ..state },
        HistoryEntry::CursorJump(index as u64),
    );
    Transition::new(state)
        .with_opt(persist)
        .with(Effect::ScrollIntoView { index })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchStep {
    /// Land on the selected match; advance if already landed on it.
    Land,
    Next,
    Previous,
}

fn step_match(state: ViewerState, step: MatchStep) -> Transition {
    if !state.search.mode.scans() || state.search.raw_input.is_empty() {
        return Transition::new(state);
    }
    let (state, rescanned) = ensure_fresh(state);
    let cancel = rescanned.then_some(Effect::CancelSearch);
    if state.search.matches.is_empty() {
        return Transition::new(state).with_opt(cancel);
    }

    let search = match step {
        MatchStep::Previous => search::previous_match(state.search),
        MatchStep::Next if !rescanned => search::next_match(state.search),
        MatchStep::Land if !rescanned && state.search.landed => {
            search::next_match(state.search)
        }
        MatchStep::Next | MatchStep::Land => state.search,
    };
    let search = SearchState {
        landed: true,
        ..search
    };
    let Some(target) = search.current_match() else {
        return Transition::new(ViewerState { search, ..state }).with_opt(cancel);
    };
    let cursor = cursor::set_index(state.cursor, target as i64, &state.buffer);
    Transition::new(ViewerState {
        search,
        cursor,
        ..state
    })
    .with_opt(cancel)
    .with(Effect::ScrollIntoView { index: target })
}

fn search_escape(state: ViewerState) -> Transition {
    if state.search.raw_input.is_empty() {
        return Transition::new(focus_grid(state));
    }
    clear_search(state)
}

fn clear_search(state: ViewerState) -> Transition {
    let search = search::clear_search(state.search);
    let history = history::HistoryState {
        read_cursor: None,
        ..state.history
    };
    Transition::new(ViewerState {
        search,
        history,
        ..state
    })
    .with(Effect::CancelSearch)
}

fn debounce_elapsed(state: ViewerState, token: u64) -> Transition {
    if token != state.search.request_token || !state.search.stale {
        trace!(
            token,
            current = state.search.request_token,
            "Discarding superseded search"
        );
        return Transition::new(state);
    }
    let search = search::run_search(state.search, &state.buffer);
    debug!(matches = search.matches.len(), "Search completed");
    Transition::new(ViewerState { search, ..state })
}

// ===== History =====

fn history_loaded(state: ViewerState, entries: Vec<HistoryEntry>) -> Transition {
    let history = history::load_entries(state.history, entries);
    let restore = if history.show_last_value {
        history.last_search().cloned()
    } else {
        None
    };
    let state = ViewerState { history, ..state };
    match restore {
        Some(HistoryEntry::Hex(value)) => restore_query(state, QueryMode::Hex, value),
        Some(HistoryEntry::Text(value)) => restore_query(state, QueryMode::Text, value),
        _ => Transition::new(state),
    }
}

fn restore_query(state: ViewerState, mode: QueryMode, value: String) -> Transition {
    let search = search::load_query(state.search, mode, value);
    let token = search.request_token;
    Transition::new(ViewerState { search, ..state }).with(Effect::ScheduleSearch { token })
}

fn history_navigate(state: ViewerState, direction: HistoryDirection) -> Transition {
    if state.history.entries.is_empty() {
        return Transition::new(state);
    }
    let history = history::navigate(state.history, direction);
    let Some(entry) = history.current().cloned() else {
        return Transition::new(ViewerState { history, ..state });
    };
    let (mode, value) = match entry {
        HistoryEntry::Hex(value) => (QueryMode::Hex, value),
        HistoryEntry::Text(value) => (QueryMode::Text, value),
        HistoryEntry::CursorJump(index) => (
            QueryMode::Offset,
            format_offset(index, state.layout.offset_base, 0),
        ),
    };
    let search = search::load_query(state.search, mode, value);
    Transition::new(ViewerState {
        search,
        history,
        ..state
    })
    .with(Effect::CancelSearch)
}

// ===== Layout, settings and folding =====

/// Install a new layout, re-deriving folding and scroll.
fn relayout(state: ViewerState, layout: layout::LayoutState) -> ViewerState {
    let columns_changed = layout.columns != state.layout.columns;
    let state = ViewerState { layout, ..state };
    let state = if columns_changed { state.refold() } else { state };
    clamp_scroll(state)
}

fn clamp_scroll(state: ViewerState) -> ViewerState {
    let scroll = scroll::clamp(state.scroll, state.scroll_bounds());
    ViewerState { scroll, ..state }
}

fn settings_changed(state: ViewerState) -> Transition {
    let settings = state.settings();
    Transition::new(state).with(Effect::PersistSettings(settings))
}

fn apply_settings(state: ViewerState, settings: Settings) -> ViewerState {
    let layout = settings.apply_to(state.layout.clone(), state.buffer.len());
    let history = history::HistoryState {
        show_last_value: settings.show_history_last_value,
        ..state.history
    };
    relayout(ViewerState { history, ..state }, layout)
}

fn set_folding(state: ViewerState, active: bool) -> ViewerState {
    let total_rows = state.total_rows();
    let folding = folding::set_active(state.folding, active, total_rows);
    clamp_scroll(ViewerState { folding, ..state }.refold())
}

// ===== Location =====

fn location_init(mut state: ViewerState, location: Location) -> Transition {
    if state.location.loaded {
        trace!("Ignoring repeated location hydration");
        return Transition::new(state);
    }

    let mut effects = Vec::new();

    if let Some(index) = location.cursor {
        state.cursor = cursor::set_index(state.cursor, to_index(index), &state.buffer);
        effects.extend(state.cursor.index.map(|index| Effect::ScrollIntoView { index }));
    }
    if let (Some(start), Some(end)) = (location.select_start, location.select_end) {
        state.selection =
            selection::set_range(state.selection, to_index(start), to_index(end), &state.buffer);
    }
    if let Some(mode) = location.search_type {
        let mut search = search::clear_search(state.search);
        search.mode = mode;
        if let Some(value) = location.search_value {
            search = search::run_search(search::load_query(search, mode, value), &state.buffer);
            if let Some(index) = location.search_index {
                search = search::select_match(search, index);
            }
        }
        state.search = search;
        effects.push(Effect::CancelSearch);
    }
    state.location.loaded = true;

    Transition { state, effects }
}

#[cfg(test)]
#[path = "reducer_tests.rs"]
mod tests;
