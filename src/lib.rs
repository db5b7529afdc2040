//! hexgrid: terminal byte viewer
//!
//! Shows a byte payload as a grid of offset labels, hex pairs and text
//! glyphs, with incremental hex/text search, offset jumps, query history,
//! range selection, folding of repeated rows and shareable locations.
//!
//! The crate follows a Pure Core / Impure Shell split: [`state`] is a pure
//! reducer over immutable snapshots, [`session`] applies its effects
//! (debounce, persistence) and [`view`] drives the terminal.

pub mod config;
pub mod logging;
pub mod model;
pub mod session;
pub mod source;
pub mod state;
pub mod storage;
pub mod view;
