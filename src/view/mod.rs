//! Terminal host (impure shell).
//!
//! Owns the terminal and a [`ViewerSession`]. Translates crossterm events
//! into reducer actions, paces the search debounce through the event poll
//! timeout, and renders each committed snapshot.

pub mod constants;
pub mod grid;
pub mod layout;
mod search_input;
mod status_bar;
pub mod styles;

pub use grid::{byte_at, GridGeometry, HexGrid};
pub use layout::{calculate_areas, render_layout, RenderContext, ScreenAreas};
pub use search_input::SearchInput;
pub use status_bar::StatusBar;
pub use styles::{ColorConfig, GridStyles, Highlight};

use crate::config::keybindings::KeyBindings;
use crate::model::{GlyphSet, KeyAction};
use crate::session::ViewerSession;
use crate::state::{
    Action, ArrowKey, CursorMotion, Focus, Location, QueryMode, ScrollMotion, SearchEdit, Viewport,
};
use crate::storage::Storage;
use constants::{IDLE_POLL_INTERVAL, OFFSET_BASE_CYCLE, WHEEL_SCROLL_ROWS};
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Initial actions requested on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupOptions {
    /// Manual column count.
    pub columns: Option<usize>,
    /// Shared location to hydrate.
    pub location: Option<Location>,
    /// Query mode to start in.
    pub mode: Option<QueryMode>,
    /// Query to start with; scanned after the usual debounce.
    pub search: Option<String>,
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend, and over
/// storage so tests never touch the filesystem.
pub struct TuiApp<B, S>
where
    B: ratatui::backend::Backend,
    S: Storage,
{
    terminal: Terminal<B>,
    session: ViewerSession<S>,
    key_bindings: KeyBindings,
    styles: GridStyles,
    glyphs: GlyphSet,
    /// Last rendered areas (for mouse hit testing)
    last_areas: Option<ScreenAreas>,
    /// Last location produced by the share key
    shared_location: Option<String>,
}

impl<S: Storage> TuiApp<CrosstermBackend<Stdout>, S> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen and mouse capture.
    pub fn new(session: ViewerSession<S>, glyphs: GlyphSet, colors: ColorConfig) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(event::EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self::with_terminal(terminal, session, glyphs, colors))
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Blocks in the event poll until
    /// input arrives or the pending search debounce runs out.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            let timeout = self
                .session
                .time_until_search(Instant::now())
                .unwrap_or(IDLE_POLL_INTERVAL);

            if event::poll(timeout)? {
                let now = Instant::now();
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key, now) {
                            return Ok(());
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse, now),
                    Event::Resize(width, height) => self.handle_resize(width, height, now),
                    _ => continue,
                }
                // A burst of events can outlast the debounce deadline
                self.session.poll(now);
                self.draw()?;
            } else if self.session.poll(Instant::now()) {
                self.draw()?;
            }
        }
    }
}

impl<B, S> TuiApp<B, S>
where
    B: ratatui::backend::Backend,
    S: Storage,
{
    /// Wrap an already initialized terminal.
    pub fn with_terminal(
        terminal: Terminal<B>,
        session: ViewerSession<S>,
        glyphs: GlyphSet,
        colors: ColorConfig,
    ) -> Self {
        Self {
            terminal,
            session,
            key_bindings: KeyBindings::default(),
            styles: GridStyles::with_color_config(colors),
            glyphs,
            last_areas: None,
            shared_location: None,
        }
    }

    /// The wrapped session.
    pub fn session(&self) -> &ViewerSession<S> {
        &self.session
    }

    /// Measure the terminal and lay the grid out for it.
    pub fn fit_to_terminal(&mut self, now: Instant) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        self.handle_resize(size.width, size.height, now);
        Ok(())
    }

    /// Apply command-line startup actions, in a fixed order: columns, then
    /// the shared location, then the explicit mode and query.
    pub fn apply_startup(&mut self, options: StartupOptions, now: Instant) {
        if let Some(columns) = options.columns {
            self.session.dispatch(Action::SetColumns(columns), now);
        }
        if let Some(location) = options.location {
            self.session.dispatch(Action::LocationInit(location), now);
        }
        if let Some(mode) = options.mode {
            self.session.dispatch(Action::SearchModeChange(mode), now);
        }
        if let Some(query) = options.search {
            self.session
                .dispatch(Action::SearchInput(SearchEdit::Replace(query)), now);
        }
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        // Ctrl+C always quits, even while typing a query
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let actions: Vec<Action> = match self.session.state().focus {
            Focus::SearchBar => self.search_bar_action(key).into_iter().collect(),
            Focus::Grid => match self.key_bindings.get(key) {
                Some(KeyAction::Quit) => return true,
                Some(KeyAction::ShareLocation) => {
                    self.share_location();
                    Vec::new()
                }
                Some(action) => self.grid_actions(action),
                None => Vec::new(),
            },
        };

        for action in actions {
            self.session.dispatch(action, now);
        }
        false
    }

    /// Keys typed into the focused search bar.
    fn search_bar_action(&self, key: KeyEvent) -> Option<Action> {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Enter => Action::SearchEnterKey {
                shift: key.modifiers.contains(KeyModifiers::SHIFT),
            },
            KeyCode::Esc => Action::SearchEscapeKey,
            KeyCode::Tab => Action::SearchModeChange(self.session.state().search.mode.cycle()),
            KeyCode::Backspace => Action::SearchInput(SearchEdit::Backspace),
            KeyCode::Delete => Action::SearchInput(SearchEdit::Delete),
            KeyCode::Home => Action::SearchInput(SearchEdit::CaretHome),
            KeyCode::End => Action::SearchInput(SearchEdit::CaretEnd),
            KeyCode::Left => Action::ArrowKey(ArrowKey::Left),
            KeyCode::Right => Action::ArrowKey(ArrowKey::Right),
            KeyCode::Up => Action::ArrowKey(ArrowKey::Up),
            KeyCode::Down => Action::ArrowKey(ArrowKey::Down),
            KeyCode::Char('u') if control => Action::SearchClear,
            KeyCode::Char(ch) if !control && !key.modifiers.contains(KeyModifiers::ALT) => {
                Action::SearchInput(SearchEdit::Insert(ch))
            }
            _ => return None,
        };
        Some(action)
    }

    /// Bound keys while the grid has focus.
    fn grid_actions(&self, key_action: KeyAction) -> Vec<Action> {
        let state = self.session.state();
        let layout = &state.layout;
        let action = match key_action {
            KeyAction::CursorLeft => Action::CursorMove(CursorMotion::Left),
            KeyAction::CursorRight => Action::CursorMove(CursorMotion::Right),
            KeyAction::CursorUp => Action::CursorMove(CursorMotion::Up),
            KeyAction::CursorDown => Action::CursorMove(CursorMotion::Down),
            KeyAction::CursorPageUp => Action::CursorMove(CursorMotion::PageUp),
            KeyAction::CursorPageDown => Action::CursorMove(CursorMotion::PageDown),
            KeyAction::CursorHome => Action::CursorMove(CursorMotion::Home),
            KeyAction::CursorEnd => Action::CursorMove(CursorMotion::End),
            KeyAction::ScrollUp => Action::Scroll(ScrollMotion::Rows(-1)),
            KeyAction::ScrollDown => Action::Scroll(ScrollMotion::Rows(1)),
            KeyAction::FocusSearch => Action::FocusSearch,
            KeyAction::NextMatch => Action::SearchNext,
            KeyAction::PrevMatch => Action::SearchPrevious,
            KeyAction::CycleQueryMode => Action::SearchModeChange(state.search.mode.cycle()),
            KeyAction::ClearSelection => {
                return vec![Action::SelectionClear, Action::CursorClear];
            }
            KeyAction::ToggleFolding => Action::FoldingToggle,
            KeyAction::ColumnsIncrease => Action::SetColumns(layout.columns + 1),
            KeyAction::ColumnsDecrease => Action::SetColumns(layout.columns.saturating_sub(1).max(1)),
            KeyAction::ToggleAutoColumns => Action::SetColumnsAuto(!layout.columns_auto),
            KeyAction::CycleOffsetBase => Action::SetOffsetBase(next_offset_base(layout.offset_base)),
            KeyAction::ToggleShowLastHistory => {
                Action::SetShowHistoryLastValue(!state.history.show_last_value)
            }
            // Handled before dispatch
            KeyAction::ShareLocation | KeyAction::Quit => return Vec::new(),
        };
        vec![action]
    }

    fn share_location(&mut self) {
        let location = self.session.state().location().to_query_string();
        info!(%location, "Shared location");
        self.shared_location = Some(location);
    }

    /// Handle a single mouse event
    ///
    /// Left button presses, drags and releases over the grid become pointer
    /// actions; a press on the search bar focuses it; the wheel scrolls.
    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let Some(areas) = self.last_areas else {
            return;
        };
        let hit = || byte_at(self.session.state(), areas.grid, mouse.column, mouse.row);
        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if contains(areas.search, mouse.column, mouse.row) {
                    Some(Action::FocusSearch)
                } else {
                    hit().map(|index| Action::PointerDown { index })
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => hit().map(|index| Action::PointerEnter { index }),
            MouseEventKind::Up(MouseButton::Left) => Some(Action::PointerUp),
            MouseEventKind::ScrollUp => Some(Action::Scroll(ScrollMotion::Rows(-WHEEL_SCROLL_ROWS))),
            MouseEventKind::ScrollDown => Some(Action::Scroll(ScrollMotion::Rows(WHEEL_SCROLL_ROWS))),
            _ => None,
        };
        if let Some(action) = action {
            self.session.dispatch(action, now);
        }
    }

    /// Handle a terminal resize event
    ///
    /// The terminal metrics expect the full terminal size in cells.
    fn handle_resize(&mut self, width: u16, height: u16, now: Instant) {
        debug!(width, height, "Handling resize");
        let viewport = Viewport {
            width: u32::from(width),
            height: u32::from(height),
        };
        self.session.dispatch(Action::LayoutResize(viewport), now);
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        self.last_areas = Some(calculate_areas(Rect::new(0, 0, size.width, size.height)));

        let state = self.session.state();
        let context = RenderContext {
            styles: &self.styles,
            glyphs: self.glyphs,
            shared_location: self.shared_location.as_deref(),
        };
        self.terminal.draw(|frame| render_layout(frame, state, &context))?;
        Ok(())
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    area.contains((x, y).into())
}

/// Base after `base` in the cycle. Bases outside the cycle restart it.
fn next_offset_base(base: u32) -> u32 {
    OFFSET_BASE_CYCLE
        .iter()
        .position(|&b| b == base)
        .map_or(OFFSET_BASE_CYCLE[0], |i| {
            OFFSET_BASE_CYCLE[(i + 1) % OFFSET_BASE_CYCLE.len()]
        })
}

/// Initialize and run the TUI application over a started session
///
/// This is the main entry point for the TUI. It handles terminal
/// setup, runs the event loop, and ensures cleanup on exit.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_with_session<S: Storage>(
    session: ViewerSession<S>,
    glyphs: GlyphSet,
    colors: ColorConfig,
    options: StartupOptions,
) -> Result<(), TuiError> {
    let result = TuiApp::new(session, glyphs, colors).and_then(|mut app| {
        let now = Instant::now();
        app.fit_to_terminal(now)?;
        app.apply_startup(options, now);
        app.run()
    });

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
