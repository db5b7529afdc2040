//! Layout dimension constants for TUI rendering.
//!
//! Centralized location for all layout-related numeric values. Their sum
//! must stay in step with [`crate::state::LayoutMetrics::cells`].

use std::time::Duration;

/// Height of the search bar in lines (border + content).
pub const SEARCH_BAR_HEIGHT: u16 = 3;

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Cells between the offset label and the hex column.
pub const OFFSET_GAP: u16 = 2;

/// Gap between the hex column and the text column.
pub const TEXT_GAP: u16 = 1;

/// Cells taken by one hex pair and its trailing space.
pub const HEX_CELL_WIDTH: u16 = 3;

/// Rows scrolled by one mouse wheel notch.
pub const WHEEL_SCROLL_ROWS: i64 = 3;

/// Event poll timeout while no search is pending.
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Offset bases visited by the cycle key, in order.
pub const OFFSET_BASE_CYCLE: [u32; 4] = [16, 10, 8, 2];
