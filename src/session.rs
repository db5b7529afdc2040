//! Viewing session: the impure shell around the pure reducer.
//!
//! Owns the current snapshot, the persistent storage and the search debounce
//! deadline. Every action goes through [`ViewerSession::dispatch`], which
//! commits the new snapshot and then applies its effects in order. Time is
//! always passed in, so the debounce is testable without sleeping.

use crate::state::{dispatch, Action, Effect, Transition, ViewerState};
use crate::storage::{self, Storage};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default idle time between the last keystroke and the scan.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingSearch {
    token: u64,
    deadline: Instant,
}

/// A viewer snapshot plus the side-effecting machinery around it.
#[derive(Debug)]
pub struct ViewerSession<S: Storage> {
    state: ViewerState,
    storage: S,
    debounce: Duration,
    pending: Option<PendingSearch>,
}

impl<S: Storage> ViewerSession<S> {
    /// Wrap an initial snapshot.
    pub fn new(state: ViewerState, storage: S, debounce: Duration) -> Self {
        Self {
            state,
            storage,
            debounce,
            pending: None,
        }
    }

    /// Load persisted settings, then history.
    ///
    /// Settings go first so that the "show last history value" flag is in
    /// place when history arrives. Without saved settings the initial
    /// snapshot's layout is kept.
    pub fn start(&mut self, now: Instant) {
        if let Some(settings) = storage::load_settings(&self.storage) {
            self.dispatch(Action::SettingsLoaded(settings), now);
        }
        let history = storage::load_history(&self.storage);
        debug!(entries = history.len(), "Loaded history");
        self.dispatch(Action::HistoryLoaded(history), now);
    }

    /// Current snapshot.
    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Dispatch an action and apply its effects.
    pub fn dispatch(&mut self, action: Action, now: Instant) {
        let current = std::mem::take(&mut self.state);
        let Transition { state, effects } = dispatch(current, action);
        self.state = state;
        for effect in effects {
            self.apply(effect, now);
        }
    }

    fn apply(&mut self, effect: Effect, now: Instant) {
        match effect {
            Effect::ScheduleSearch { token } => {
                self.pending = Some(PendingSearch {
                    token,
                    deadline: now + self.debounce,
                });
            }
            Effect::CancelSearch => self.pending = None,
            Effect::PersistHistory(entries) => {
                if let Err(e) = storage::save_history(&mut self.storage, &entries) {
                    warn!(error = %e, "Failed to persist history");
                }
            }
            Effect::PersistSettings(settings) => {
                if let Err(e) = storage::save_settings(&mut self.storage, &settings) {
                    warn!(error = %e, "Failed to persist settings");
                }
            }
            // Runs against the committed snapshot, after the action that requested it.
            Effect::ScrollIntoView { index } => {
                self.dispatch(Action::ScrollIntoView { index }, now);
            }
        }
    }

    /// Fire the search debounce if its deadline has passed.
    ///
    /// Returns true when a search ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(pending) if now >= pending.deadline => {
                self.pending = None;
                self.dispatch(
                    Action::SearchDebounceElapsed {
                        token: pending.token,
                    },
                    now,
                );
                true
            }
            _ => false,
        }
    }

    /// Time left before the pending search fires.
    pub fn time_until_search(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|pending| pending.deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ByteBuffer;
    use crate::state::{HistoryEntry, LayoutState, QueryMode, SearchEdit, Settings};
    use crate::storage::{MemoryStorage, HISTORY_KEY, SETTINGS_KEY};

    fn session(bytes: &[u8], storage: MemoryStorage) -> ViewerSession<MemoryStorage> {
        let state = ViewerState::new(ByteBuffer::from(bytes), LayoutState::default());
        ViewerSession::new(state, storage, Duration::from_millis(100))
    }

    fn type_text(session: &mut ViewerSession<MemoryStorage>, text: &str, now: Instant) {
        for c in text.chars() {
            session.dispatch(Action::SearchInput(SearchEdit::Insert(c)), now);
        }
    }

    #[test]
    fn search_waits_for_debounce() {
        let t0 = Instant::now();
        let mut session = session(b"xAB", MemoryStorage::new());
        type_text(&mut session, "AB", t0);
        assert_eq!(session.time_until_search(t0), Some(Duration::from_millis(100)));

        assert!(!session.poll(t0 + Duration::from_millis(50)));
        assert!(session.state().search.matches.is_empty());

        assert!(session.poll(t0 + Duration::from_millis(100)));
        assert_eq!(session.state().search.matches, vec![1]);
        assert_eq!(session.time_until_search(t0), None);
    }

    #[test]
    fn new_keystroke_pushes_deadline_back() {
        let t0 = Instant::now();
        let mut session = session(b"AB", MemoryStorage::new());
        type_text(&mut session, "A", t0);
        type_text(&mut session, "B", t0 + Duration::from_millis(80));
        assert!(!session.poll(t0 + Duration::from_millis(120)));
        assert!(session.poll(t0 + Duration::from_millis(180)));
        assert_eq!(session.state().search.matches, vec![0]);
    }

    #[test]
    fn clearing_cancels_pending_search() {
        let t0 = Instant::now();
        let mut session = session(b"AB", MemoryStorage::new());
        type_text(&mut session, "A", t0);
        session.dispatch(Action::SearchClear, t0);
        assert_eq!(session.time_until_search(t0), None);
        assert!(!session.poll(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn enter_persists_history_and_scrolls() {
        let t0 = Instant::now();
        let mut bytes = vec![0u8; 16 * 100];
        bytes.extend_from_slice(b"AB");
        let mut session = session(&bytes, MemoryStorage::new());
        type_text(&mut session, "AB", t0);
        session.dispatch(Action::SearchEnterKey { shift: false }, t0);

        assert_eq!(session.state().cursor.index, Some(1600));
        assert!(session.state().scroll.top_row > 0, "scrolled to the match");
        assert_eq!(
            session.storage().get(HISTORY_KEY),
            Some(r#"[{"type":"text","value":"AB"}]"#)
        );
    }

    #[test]
    fn start_loads_settings_before_history() {
        let mut storage = MemoryStorage::new();
        storage
            .save(SETTINGS_KEY, r#"{"offsetBase":8,"showHistoryLastValue":true}"#)
            .unwrap();
        storage
            .save(HISTORY_KEY, r#"[{"type":"hex","value":"42"}]"#)
            .unwrap();
        let t0 = Instant::now();
        let mut session = session(b"AB", storage);
        session.start(t0);

        assert_eq!(session.state().layout.offset_base, 8);
        assert_eq!(session.state().search.mode, QueryMode::Hex);
        assert_eq!(session.state().search.raw_input, "42");
        assert_eq!(
            session.state().history.entries,
            vec![HistoryEntry::Hex("42".into())]
        );
        assert!(session.poll(t0 + Duration::from_millis(100)));
        assert_eq!(session.state().search.matches, vec![1]);
    }

    #[test]
    fn settings_changes_are_saved() {
        let t0 = Instant::now();
        let mut session = session(b"AB", MemoryStorage::new());
        session.dispatch(Action::SetOffsetBase(10), t0);
        let saved: Settings =
            serde_json::from_str(session.storage().get(SETTINGS_KEY).unwrap()).unwrap();
        assert_eq!(saved.offset_base, 10);
    }
}
