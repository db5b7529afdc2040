//! Search engine (pure state transitions).
//!
//! A query is compiled from the raw input according to its mode and scanned
//! against the byte buffer. Results carry a selected-match pointer that wraps
//! in both directions. Scans are synchronous; deferral and cancellation are
//! expressed through `request_token` and the `stale` flag.

use crate::model::codec::{parse_hex_query, parse_text_query};
use crate::model::ByteBuffer;
use memchr::memchr;

// ===== QueryMode =====

/// How the search bar input is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QueryMode {
    /// Whitespace-separated hex digit pairs.
    Hex,
    /// Literal text, matched against its UTF-8 bytes.
    #[default]
    Text,
    /// Byte offset to jump to, written in the current offset base.
    Offset,
}

impl QueryMode {
    /// Next mode in the Hex → Text → Offset cycle.
    pub fn cycle(self) -> Self {
        match self {
            QueryMode::Hex => QueryMode::Text,
            QueryMode::Text => QueryMode::Offset,
            QueryMode::Offset => QueryMode::Hex,
        }
    }

    /// Short label for status displays.
    pub fn label(self) -> &'static str {
        match self {
            QueryMode::Hex => "hex",
            QueryMode::Text => "text",
            QueryMode::Offset => "offset",
        }
    }

    /// True for modes that scan the buffer.
    pub fn scans(self) -> bool {
        !matches!(self, QueryMode::Offset)
    }
}

// ===== SearchState =====

/// Query, compiled pattern and results of the search bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Interpretation of `raw_input`.
    pub mode: QueryMode,
    /// Text exactly as typed.
    pub raw_input: String,
    /// Caret position in `raw_input`, counted in chars.
    pub caret: usize,
    /// Byte pattern of the last scan. Empty means no match is possible.
    pub pattern: Vec<u8>,
    /// Start offsets of every occurrence, ascending, overlaps included.
    pub matches: Vec<usize>,
    /// Index into `matches`. `None` exactly when `matches` is empty.
    pub selected: Option<usize>,
    /// Bumped whenever the input changes or a scan is superseded.
    pub request_token: u64,
    /// True while `matches` does not reflect `raw_input`.
    pub stale: bool,
    /// True once Enter or next/previous has moved the cursor onto the
    /// selected match of the current results.
    pub landed: bool,
}

impl SearchState {
    /// Offset of the selected match.
    pub fn current_match(&self) -> Option<usize> {
        self.selected.and_then(|i| self.matches.get(i).copied())
    }

    /// Length in bytes of a highlighted match.
    pub fn match_len(&self) -> usize {
        self.pattern.len()
    }

    /// True when `index` falls inside any match.
    ///
    /// Uses a binary search over the sorted match starts, so it is cheap to
    /// call per rendered byte.
    pub fn is_match_byte(&self, index: usize) -> bool {
        let len = self.match_len();
        if len == 0 {
            return false;
        }
        // Last match starting at or before index.
        let upper = self.matches.partition_point(|&start| start <= index);
        upper > 0 && index < self.matches[upper - 1] + len
    }

    /// True when `index` falls inside the selected match.
    pub fn is_selected_match_byte(&self, index: usize) -> bool {
        self.current_match()
            .is_some_and(|start| index >= start && index < start + self.match_len())
    }
}

// ===== Compilation and scanning =====

/// Compile raw input into a byte pattern. Offset mode never produces one.
pub fn compile_pattern(mode: QueryMode, raw_input: &str) -> Vec<u8> {
    if raw_input.is_empty() {
        return Vec::new();
    }
    match mode {
        QueryMode::Hex => parse_hex_query(raw_input),
        QueryMode::Text => parse_text_query(raw_input),
        QueryMode::Offset => Vec::new(),
    }
}

/// Every start offset of `pattern` in `haystack`, left to right.
///
/// Candidates are located by their first byte with `memchr`. Overlapping
/// occurrences are all reported: the scan resumes one byte after each match
/// start, not after its end.
pub fn find_matches(haystack: &[u8], pattern: &[u8]) -> Vec<usize> {
    let Some((&first, rest)) = pattern.split_first() else {
        return Vec::new();
    };
    if pattern.len() > haystack.len() {
        return Vec::new();
    }

    let last_start = haystack.len() - pattern.len();
    let mut matches = Vec::new();
    let mut start = 0;
    while start <= last_start {
        match memchr(first, &haystack[start..=last_start]) {
            Some(offset) => {
                let candidate = start + offset;
                if &haystack[candidate + 1..candidate + pattern.len()] == rest {
                    matches.push(candidate);
                }
                start = candidate + 1;
            }
            None => break,
        }
    }
    matches
}

/// Compile the current input and scan the buffer.
///
/// The selected match starts at the first result. The state is fresh
/// afterwards; the token is left alone so callers decide whether a pending
/// debounce is superseded.
pub fn run_search(state: SearchState, buffer: &ByteBuffer) -> SearchState {
    let pattern = compile_pattern(state.mode, &state.raw_input);
    let matches = find_matches(buffer.as_slice(), &pattern);
    let selected = if matches.is_empty() { None } else { Some(0) };
    SearchState {
        pattern,
        matches,
        selected,
        stale: false,
        landed: false,
        ..state
    }
}

/// Mark the results out of date and issue a new request token.
///
/// Any debounce armed for an earlier token is superseded.
pub fn invalidate(state: SearchState) -> SearchState {
    SearchState {
        request_token: state.request_token.wrapping_add(1),
        stale: true,
        landed: false,
        ..state
    }
}

/// Reset query and results. The mode is kept.
pub fn clear_search(state: SearchState) -> SearchState {
    SearchState {
        mode: state.mode,
        request_token: state.request_token.wrapping_add(1),
        ..SearchState::default()
    }
}

/// Replace the query with a new mode and input, leaving results stale.
pub fn load_query(state: SearchState, mode: QueryMode, raw_input: String) -> SearchState {
    let caret = raw_input.chars().count();
    invalidate(SearchState {
        mode,
        raw_input,
        caret,
        pattern: Vec::new(),
        matches: Vec::new(),
        selected: None,
        ..state
    })
}

// ===== Match navigation =====

/// Select the next match, wrapping from last to first.
pub fn next_match(state: SearchState) -> SearchState {
    let len = state.matches.len();
    if len == 0 {
        return state;
    }
    let selected = state.selected.map_or(0, |i| (i + 1) % len);
    SearchState {
        selected: Some(selected),
        ..state
    }
}

/// Select the previous match, wrapping from first to last.
pub fn previous_match(state: SearchState) -> SearchState {
    let len = state.matches.len();
    if len == 0 {
        return state;
    }
    let selected = state.selected.map_or(len - 1, |i| (i + len - 1) % len);
    SearchState {
        selected: Some(selected),
        ..state
    }
}

/// Select a match by position, clamped into the match list.
pub fn select_match(state: SearchState, index: usize) -> SearchState {
    if state.matches.is_empty() {
        return state;
    }
    let selected = index.min(state.matches.len() - 1);
    SearchState {
        selected: Some(selected),
        ..state
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
