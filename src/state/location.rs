//! Shareable location.
//!
//! Encodes cursor, selection and search into a URL query string such as
//! `cursor=16&selectStart=4&selectEnd=9&searchType=text&searchValue=4142&searchIndex=0`
//! and parses it back. Search values are always hex-encoded bytes so the
//! string stays URL safe. Unknown keys and malformed values are skipped.

use crate::model::codec::{format_hex_pairs, parse_hex_query};
use crate::state::cursor::CursorState;
use crate::state::search::{QueryMode, SearchState};
use crate::state::selection::SelectionState;

/// Whether a location has already been applied this session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationState {
    /// Set by the first hydration; later ones are ignored.
    pub loaded: bool,
}

/// Decoded location. Absent keys are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Cursor byte.
    pub cursor: Option<u64>,
    /// Selection start byte.
    pub select_start: Option<u64>,
    /// Selection end byte.
    pub select_end: Option<u64>,
    /// Search mode; only Hex and Text are shareable.
    pub search_type: Option<QueryMode>,
    /// Search input to restore, already decoded for its mode.
    pub search_value: Option<String>,
    /// Selected match position.
    pub search_index: Option<usize>,
}

impl Location {
    /// Capture the shareable parts of a viewer.
    pub fn capture(cursor: &CursorState, selection: &SelectionState, search: &SearchState) -> Self {
        let (search_type, search_value) = match search.mode {
            QueryMode::Hex | QueryMode::Text if !search.raw_input.is_empty() => {
                (Some(search.mode), Some(search.raw_input.clone()))
            }
            _ => (None, None),
        };
        Self {
            cursor: cursor.index.map(|i| i as u64),
            select_start: selection.range.map(|r| r.start as u64),
            select_end: selection.range.map(|r| r.end as u64),
            search_type,
            search_value,
            search_index: search_type.and(search.selected),
        }
    }

    /// Encode as a query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(cursor) = self.cursor {
            pairs.push(("cursor", cursor.to_string()));
        }
        if let (Some(start), Some(end)) = (self.select_start, self.select_end) {
            pairs.push(("selectStart", start.to_string()));
            pairs.push(("selectEnd", end.to_string()));
        }
        if let (Some(mode), Some(value)) = (self.search_type, &self.search_value) {
            let bytes = match mode {
                QueryMode::Hex => parse_hex_query(value),
                _ => value.as_bytes().to_vec(),
            };
            if !bytes.is_empty() {
                pairs.push(("searchType", mode.label().to_string()));
                pairs.push(("searchValue", hex::encode(bytes)));
                if let Some(index) = self.search_index {
                    pairs.push(("searchIndex", index.to_string()));
                }
            }
        }
        pairs
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parse a query string, with or without a leading `?`.
    pub fn parse(query: &str) -> Self {
        let mut location = Location::default();
        let mut raw_value = None;
        for pair in query.trim().trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "cursor" => location.cursor = value.parse().ok(),
                "selectStart" => location.select_start = value.parse().ok(),
                "selectEnd" => location.select_end = value.parse().ok(),
                "searchIndex" => location.search_index = value.parse().ok(),
                "searchType" => {
                    location.search_type = match value {
                        "hex" => Some(QueryMode::Hex),
                        "text" => Some(QueryMode::Text),
                        _ => None,
                    }
                }
                "searchValue" => raw_value = hex::decode(value).ok(),
                _ => {}
            }
        }
        location.search_value = match (location.search_type, raw_value) {
            (Some(QueryMode::Hex), Some(bytes)) if !bytes.is_empty() => {
                Some(format_hex_pairs(&bytes))
            }
            (Some(QueryMode::Text), Some(bytes)) if !bytes.is_empty() => {
                Some(String::from_utf8_lossy(&bytes).into_owned())
            }
            _ => None,
        };
        location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::selection::SelectionRange;

    #[test]
    fn encodes_all_fields() {
        let location = Location {
            cursor: Some(16),
            select_start: Some(4),
            select_end: Some(9),
            search_type: Some(QueryMode::Text),
            search_value: Some("AB".into()),
            search_index: Some(0),
        };
        assert_eq!(
            location.to_query_string(),
            "cursor=16&selectStart=4&selectEnd=9&searchType=text&searchValue=4142&searchIndex=0"
        );
    }

    #[test]
    fn omits_absent_fields() {
        let location = Location {
            cursor: Some(3),
            ..Location::default()
        };
        assert_eq!(location.to_query_string(), "cursor=3");
        assert_eq!(Location::default().to_query_string(), "");
    }

    #[test]
    fn parses_with_leading_question_mark() {
        let location = Location::parse("?cursor=5&searchType=hex&searchValue=dead&searchIndex=2");
        assert_eq!(location.cursor, Some(5));
        assert_eq!(location.search_type, Some(QueryMode::Hex));
        assert_eq!(location.search_value.as_deref(), Some("de ad"));
        assert_eq!(location.search_index, Some(2));
    }

    #[test]
    fn text_values_are_hex_decoded() {
        let location = Location::parse("searchType=text&searchValue=4142");
        assert_eq!(location.search_value.as_deref(), Some("AB"));
    }

    #[test]
    fn malformed_values_are_skipped() {
        let location = Location::parse("cursor=abc&selectStart=-1&searchType=regex&searchValue=zz&bogus");
        assert_eq!(location, Location::default());
    }

    #[test]
    fn capture_skips_offset_mode_and_empty_input() {
        let search = SearchState {
            mode: QueryMode::Offset,
            raw_input: "10".into(),
            ..SearchState::default()
        };
        let selection = SelectionState {
            range: Some(SelectionRange { start: 1, end: 2 }),
            drag: None,
        };
        let location = Location::capture(&CursorState { index: Some(7) }, &selection, &search);
        assert_eq!(location.to_query_string(), "cursor=7&selectStart=1&selectEnd=2");
    }
}
