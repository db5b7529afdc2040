//! Configuration file loading with precedence handling.

use crate::model::codec::{
    GlyphSet, HigherEncoding, LowerEncoding, MAX_OFFSET_BASE, MIN_OFFSET_BASE,
};
use crate::state::layout::{ColumnBreakpoint, DEFAULT_OFFSET_BASE};
use crate::state::history::DEFAULT_MAX_SIZE;
use crate::storage::default_storage_dir;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "HEXGRID_CONFIG";
/// Env var overriding the offset base.
pub const OFFSET_BASE_ENV: &str = "HEXGRID_OFFSET_BASE";
/// Env var overriding the search debounce, in milliseconds.
pub const DEBOUNCE_ENV: &str = "HEXGRID_DEBOUNCE_MS";

/// Default search debounce in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;
/// Longest accepted debounce. Larger values are replaced by the default.
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional. Corresponds to `~/.config/hexgrid/config.toml`:
///
/// ```toml
/// offset_base = 10
/// search_debounce_ms = 150
/// null_char = "·"
/// higher_encoding = "windows1252"
///
/// [[column_breakpoints]]
/// min_width = 141
/// columns = 32
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Base of offset labels and offset-jump queries.
    #[serde(default)]
    pub offset_base: Option<u32>,

    /// Idle time before an edited query is scanned.
    #[serde(default)]
    pub search_debounce_ms: Option<u64>,

    /// Number of remembered queries.
    #[serde(default)]
    pub history_max_size: Option<usize>,

    /// Restore the last query on startup.
    #[serde(default)]
    pub show_history_last_value: Option<bool>,

    /// Directory holding persisted history and settings.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Replacement for the terminal column table.
    #[serde(default)]
    pub column_breakpoints: Option<Vec<ColumnBreakpoint>>,

    /// Glyph for `0x00` in the text column.
    #[serde(default)]
    pub null_char: Option<char>,

    /// Glyph for control characters and space.
    #[serde(default)]
    pub non_printable_char: Option<char>,

    /// Glyph for bytes `0x7F` and above.
    #[serde(default)]
    pub higher_char: Option<char>,

    /// `"hidden"` or `"cp437"`.
    #[serde(default)]
    pub lower_encoding: Option<LowerEncoding>,

    /// `"hidden"`, `"cp437"` or `"windows1252"`.
    #[serde(default)]
    pub higher_encoding: Option<HigherEncoding>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Offset base, in `2..=36`.
    pub offset_base: u32,
    /// Search debounce in milliseconds.
    pub search_debounce_ms: u64,
    /// History cap, at least 1.
    pub history_max_size: usize,
    /// Restore the last query on startup.
    pub show_history_last_value: bool,
    /// Directory holding persisted history and settings.
    pub storage_dir: PathBuf,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Column table override. `None` keeps the built-in table.
    pub column_breakpoints: Option<Vec<ColumnBreakpoint>>,
    /// Text-column glyphs.
    pub glyphs: GlyphSet,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            offset_base: DEFAULT_OFFSET_BASE,
            search_debounce_ms: DEFAULT_DEBOUNCE_MS,
            history_max_size: DEFAULT_MAX_SIZE,
            show_history_last_value: false,
            storage_dir: default_storage_dir(),
            log_file_path: default_log_path(),
            column_breakpoints: None,
            glyphs: GlyphSet::default(),
        }
    }
}

impl ResolvedConfig {
    /// Debounce as a duration.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/hexgrid/hexgrid.log` on Linux, the platform state
/// directory elsewhere, or `hexgrid.log` in the current directory when no
/// state directory exists (macOS, Windows).
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("hexgrid").join("hexgrid.log")
    } else {
        PathBuf::from("hexgrid.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/hexgrid/config.toml` on Linux, appropriate path on other
/// platforms, `None` if no config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hexgrid").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `HEXGRID_CONFIG` environment variable
/// 3. Default path `~/.config/hexgrid/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV} is empty")));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

fn valid_offset_base(base: u32) -> Option<u32> {
    (MIN_OFFSET_BASE..=MAX_OFFSET_BASE)
        .contains(&base)
        .then_some(base)
}

fn valid_debounce(ms: u64) -> Option<u64> {
    (ms <= MAX_DEBOUNCE_MS).then_some(ms)
}

/// Merge config file into defaults to create resolved config.
///
/// Out-of-range values are logged and replaced with defaults: an offset base
/// outside `2..=36`, a debounce above ten seconds, a zero history size.
/// Breakpoints with zero columns are dropped.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let offset_base = match config.offset_base {
        Some(base) => valid_offset_base(base).unwrap_or_else(|| {
            warn!(base, "Config offset_base out of range, using default");
            defaults.offset_base
        }),
        None => defaults.offset_base,
    };
    let search_debounce_ms = match config.search_debounce_ms {
        Some(ms) => valid_debounce(ms).unwrap_or_else(|| {
            warn!(ms, "Config search_debounce_ms too large, using default");
            defaults.search_debounce_ms
        }),
        None => defaults.search_debounce_ms,
    };
    let history_max_size = match config.history_max_size {
        Some(0) => {
            warn!("Config history_max_size is zero, using default");
            defaults.history_max_size
        }
        Some(size) => size,
        None => defaults.history_max_size,
    };
    let column_breakpoints = config.column_breakpoints.map(|table| {
        table
            .into_iter()
            .filter(|bp| bp.columns > 0)
            .collect::<Vec<_>>()
    });

    ResolvedConfig {
        offset_base,
        search_debounce_ms,
        history_max_size,
        show_history_last_value: config
            .show_history_last_value
            .unwrap_or(defaults.show_history_last_value),
        storage_dir: config.storage_dir.unwrap_or(defaults.storage_dir),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        column_breakpoints: column_breakpoints.filter(|table| !table.is_empty()),
        glyphs: GlyphSet {
            null: config.null_char.unwrap_or(defaults.glyphs.null),
            non_printable: config
                .non_printable_char
                .unwrap_or(defaults.glyphs.non_printable),
            higher: config.higher_char.unwrap_or(defaults.glyphs.higher),
            lower_encoding: config
                .lower_encoding
                .unwrap_or(defaults.glyphs.lower_encoding),
            higher_encoding: config
                .higher_encoding
                .unwrap_or(defaults.glyphs.higher_encoding),
        },
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `HEXGRID_OFFSET_BASE`: offset base, `2..=36`
/// - `HEXGRID_DEBOUNCE_MS`: search debounce
///
/// Unparsable or out-of-range values are logged and ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(OFFSET_BASE_ENV) {
        match raw.trim().parse().ok().and_then(valid_offset_base) {
            Some(base) => config.offset_base = base,
            None => warn!(value = %raw, "Ignoring invalid {OFFSET_BASE_ENV}"),
        }
    }

    if let Ok(raw) = std::env::var(DEBOUNCE_ENV) {
        match raw.trim().parse().ok().and_then(valid_debounce) {
            Some(ms) => config.search_debounce_ms = ms,
            None => warn!(value = %raw, "Ignoring invalid {DEBOUNCE_ENV}"),
        }
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    offset_base_override: Option<u32>,
) -> ResolvedConfig {
    if let Some(base) = offset_base_override.and_then(valid_offset_base) {
        config.offset_base = base;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

#[cfg(test)]
mod log_path_tests {
    use super::*;

    #[test]
    fn default_log_path_ends_with_hexgrid_log() {
        let path = default_log_path();
        assert!(
            path.to_string_lossy().ends_with("hexgrid.log"),
            "Default log path should end with 'hexgrid.log', got: {:?}",
            path
        );
    }

    #[test]
    fn config_file_log_path_overrides_default() {
        let custom_path = PathBuf::from("/custom/path/to/app.log");
        let config_file = ConfigFile {
            log_file_path: Some(custom_path.clone()),
            ..ConfigFile::default()
        };

        let resolved = merge_config(Some(config_file));
        assert_eq!(resolved.log_file_path, custom_path);
    }

    #[test]
    fn missing_config_file_log_path_uses_default() {
        let resolved = merge_config(Some(ConfigFile::default()));
        assert_eq!(resolved.log_file_path, default_log_path());
    }
}
