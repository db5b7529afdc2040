//! Persisted viewer settings.
//!
//! Serialized as
//! `{"offsetBase":16,"column":{"auto":true,"size":16},"row":{"auto":true,"size":24},"showHistoryLastValue":false}`.
//! Missing fields take their defaults.

use crate::state::layout::{self, LayoutState, DEFAULT_COLUMNS, DEFAULT_OFFSET_BASE, DEFAULT_ROWS};
use serde::{Deserialize, Serialize};

/// Size of one grid dimension and whether it follows the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeSetting {
    /// Follows the viewport.
    pub auto: bool,
    /// Manual size.
    pub size: usize,
}

impl Default for SizeSetting {
    fn default() -> Self {
        Self {
            auto: true,
            size: DEFAULT_COLUMNS,
        }
    }
}

/// Settings panel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Base of offset labels.
    pub offset_base: u32,
    /// Byte columns.
    pub column: SizeSetting,
    /// Visible rows.
    pub row: SizeSetting,
    /// Restore the last search on load.
    pub show_history_last_value: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            offset_base: DEFAULT_OFFSET_BASE,
            column: SizeSetting {
                auto: true,
                size: DEFAULT_COLUMNS,
            },
            row: SizeSetting {
                auto: true,
                size: DEFAULT_ROWS,
            },
            show_history_last_value: false,
        }
    }
}

impl Settings {
    /// Snapshot the persisted parts of the layout.
    pub fn capture(layout: &LayoutState, show_history_last_value: bool) -> Self {
        Self {
            offset_base: layout.offset_base,
            column: SizeSetting {
                auto: layout.columns_auto,
                size: layout.columns,
            },
            row: SizeSetting {
                auto: layout.rows_auto,
                size: layout.rows,
            },
            show_history_last_value,
        }
    }

    /// Apply to a layout for a buffer of `len` bytes.
    ///
    /// Zero sizes fall back to defaults; the base is clamped. Auto
    /// dimensions are recomputed from the last viewport if one is known.
    pub fn apply_to(&self, state: LayoutState, len: usize) -> LayoutState {
        let columns = if self.column.size == 0 {
            DEFAULT_COLUMNS
        } else {
            self.column.size
        };
        let rows = if self.row.size == 0 {
            DEFAULT_ROWS
        } else {
            self.row.size
        };
        let state = LayoutState {
            columns,
            rows,
            columns_auto: self.column.auto,
            rows_auto: self.row.auto,
            ..state
        };
        let state = layout::set_offset_base(state, self.offset_base, len);
        match state.viewport {
            Some(viewport) => layout::resize(state, viewport, len),
            None => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_json_shape() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert_eq!(
            json,
            r#"{"offsetBase":16,"column":{"auto":true,"size":16},"row":{"auto":true,"size":24},"showHistoryLastValue":false}"#
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"offsetBase":8}"#).unwrap();
        assert_eq!(settings.offset_base, 8);
        assert_eq!(settings.row.size, DEFAULT_ROWS);
        assert!(settings.column.auto);
    }

    #[test]
    fn apply_sanitizes_values() {
        let settings = Settings {
            offset_base: 1,
            column: SizeSetting { auto: false, size: 0 },
            row: SizeSetting { auto: false, size: 5 },
            show_history_last_value: true,
        };
        let state = settings.apply_to(LayoutState::default(), 100);
        assert_eq!(state.offset_base, 2);
        assert_eq!(state.columns, DEFAULT_COLUMNS);
        assert_eq!(state.rows, 5);
        assert!(!state.columns_auto);
    }

    #[test]
    fn capture_then_apply_preserves_manual_sizes() {
        let layout = layout::set_columns(LayoutState::default(), 8);
        let settings = Settings::capture(&layout, false);
        let restored = settings.apply_to(LayoutState::default(), 64);
        assert_eq!(restored.columns, 8);
        assert!(!restored.columns_auto);
    }
}
