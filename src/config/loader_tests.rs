//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

fn write_temp_config(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("hexgrid_test_{}_{name}.toml", std::process::id()));
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

#[test]
fn default_config_path_contains_hexgrid_config_toml() {
    let Some(path) = default_config_path() else {
        return;
    };
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("hexgrid") && path_str.ends_with("config.toml"),
        "Path should contain 'hexgrid' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = write_temp_config(
        "valid",
        r#"
offset_base = 10
search_debounce_ms = 100
history_max_size = 25
show_history_last_value = true
storage_dir = "/tmp/hexgrid-store"
null_char = "·"
non_printable_char = "?"
higher_char = "~"
lower_encoding = "cp437"
higher_encoding = "windows1252"

[[column_breakpoints]]
min_width = 100
columns = 16

[[column_breakpoints]]
min_width = 50
columns = 8
"#,
    );

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.offset_base, Some(10));
    assert_eq!(config.search_debounce_ms, Some(100));
    assert_eq!(config.history_max_size, Some(25));
    assert_eq!(config.show_history_last_value, Some(true));
    assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/hexgrid-store")));
    assert_eq!(config.null_char, Some('·'));
    assert_eq!(config.non_printable_char, Some('?'));
    assert_eq!(config.higher_char, Some('~'));
    assert_eq!(config.lower_encoding, Some(LowerEncoding::Cp437));
    assert_eq!(config.higher_encoding, Some(HigherEncoding::Windows1252));
    assert_eq!(
        config.column_breakpoints,
        Some(vec![
            ColumnBreakpoint {
                min_width: 100,
                columns: 16
            },
            ColumnBreakpoint {
                min_width: 50,
                columns: 8
            },
        ])
    );

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = write_temp_config("invalid", "this is not valid TOML ][}{");

    let result = load_config_file(&config_path);
    match result {
        Err(ConfigError::ParseError { path, reason: _ }) => {
            assert_eq!(path, config_path);
        }
        _ => panic!("Expected ParseError, got {:?}", result),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_handles_partial_config() {
    let config_path = write_temp_config("partial", "offset_base = 8\n# Other fields omitted\n");

    let config = load_config_file(&config_path).unwrap().unwrap();
    assert_eq!(config.offset_base, Some(8));
    assert_eq!(config.search_debounce_ms, None);
    assert_eq!(config.column_breakpoints, None);

    fs::remove_file(config_path).ok();
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str("theme = \"dark\"");
    assert!(result.is_err(), "Unknown keys must be rejected");
}

#[test]
fn glyphs_must_be_single_characters() {
    let result: Result<ConfigFile, _> = toml::from_str("null_char = \"ab\"");
    assert!(result.is_err());
}

#[test]
fn merge_config_uses_defaults_when_none() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn resolved_config_default_has_expected_values() {
    let config = ResolvedConfig::default();
    assert_eq!(config.offset_base, 16);
    assert_eq!(config.search_debounce_ms, 250);
    assert_eq!(config.search_debounce(), Duration::from_millis(250));
    assert_eq!(config.history_max_size, 10);
    assert!(!config.show_history_last_value);
    assert_eq!(config.column_breakpoints, None);
    assert_eq!(config.glyphs, GlyphSet::default());
}

#[test]
fn merge_config_overrides_with_config_file_values() {
    let config_file = ConfigFile {
        offset_base: Some(8),
        search_debounce_ms: Some(0),
        history_max_size: Some(3),
        show_history_last_value: Some(true),
        null_char: Some('_'),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(config_file));

    assert_eq!(resolved.offset_base, 8);
    assert_eq!(resolved.search_debounce_ms, 0);
    assert_eq!(resolved.history_max_size, 3);
    assert!(resolved.show_history_last_value);
    assert_eq!(resolved.glyphs.null, '_');
    assert_eq!(resolved.glyphs.higher, GlyphSet::default().higher);
    assert_eq!(resolved.glyphs.higher_encoding, HigherEncoding::Hidden);
}

#[test]
fn merge_config_replaces_out_of_range_values() {
    let config_file = ConfigFile {
        offset_base: Some(37),
        search_debounce_ms: Some(MAX_DEBOUNCE_MS + 1),
        history_max_size: Some(0),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(config_file));
    let defaults = ResolvedConfig::default();

    assert_eq!(resolved.offset_base, defaults.offset_base);
    assert_eq!(resolved.search_debounce_ms, defaults.search_debounce_ms);
    assert_eq!(resolved.history_max_size, defaults.history_max_size);
}

#[test]
fn merge_config_drops_zero_column_breakpoints() {
    let config_file = ConfigFile {
        column_breakpoints: Some(vec![
            ColumnBreakpoint {
                min_width: 80,
                columns: 0,
            },
            ColumnBreakpoint {
                min_width: 40,
                columns: 4,
            },
        ]),
        ..ConfigFile::default()
    };
    let resolved = merge_config(Some(config_file));
    assert_eq!(
        resolved.column_breakpoints,
        Some(vec![ColumnBreakpoint {
            min_width: 40,
            columns: 4
        }])
    );

    let all_zero = ConfigFile {
        column_breakpoints: Some(vec![ColumnBreakpoint {
            min_width: 80,
            columns: 0,
        }]),
        ..ConfigFile::default()
    };
    assert_eq!(merge_config(Some(all_zero)).column_breakpoints, None);
}

/// RAII guard to ensure environment variable cleanup even under test parallelism.
/// Removes the var on drop, preventing test pollution in parallel execution.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
#[serial(hexgrid_env)]
fn apply_env_overrides_respects_offset_base_and_debounce() {
    let _base_guard = EnvGuard::new(OFFSET_BASE_ENV);
    let _debounce_guard = EnvGuard::new(DEBOUNCE_ENV);

    env::set_var(OFFSET_BASE_ENV, "2");
    env::set_var(DEBOUNCE_ENV, " 75 ");

    let result = apply_env_overrides(ResolvedConfig::default());

    assert_eq!(result.offset_base, 2);
    assert_eq!(result.search_debounce_ms, 75);
}

#[test]
#[serial(hexgrid_env)]
fn apply_env_overrides_ignores_invalid_values() {
    let _base_guard = EnvGuard::new(OFFSET_BASE_ENV);
    let _debounce_guard = EnvGuard::new(DEBOUNCE_ENV);

    env::set_var(OFFSET_BASE_ENV, "99");
    env::set_var(DEBOUNCE_ENV, "soon");

    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()), base);
}

#[test]
#[serial(hexgrid_env)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _base_guard = EnvGuard::new(OFFSET_BASE_ENV);
    let _debounce_guard = EnvGuard::new(DEBOUNCE_ENV);

    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()), base);
}

#[test]
#[serial(hexgrid_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);

    let explicit_path = write_temp_config("explicit", "offset_base = 10\n");
    let env_path = write_temp_config("env", "offset_base = 8\n");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(Some(explicit_path.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(
        config.offset_base,
        Some(10),
        "Should use explicit path, not HEXGRID_CONFIG env var"
    );

    fs::remove_file(explicit_path).ok();
    fs::remove_file(env_path).ok();
}

#[test]
#[serial(hexgrid_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);

    let env_path = write_temp_config("env_only", "offset_base = 8\n");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(None).unwrap().unwrap();
    assert_eq!(config.offset_base, Some(8));

    fs::remove_file(env_path).ok();
}

#[test]
#[serial(hexgrid_config)]
fn load_config_with_precedence_rejects_empty_env_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    env::set_var(CONFIG_ENV, "");

    assert!(matches!(
        load_config_with_precedence(None),
        Err(ConfigError::InvalidPath(_))
    ));
}

#[test]
fn apply_cli_overrides_offset_base() {
    let result = apply_cli_overrides(ResolvedConfig::default(), Some(8));
    assert_eq!(result.offset_base, 8);
}

#[test]
fn apply_cli_overrides_no_overrides() {
    let base = ResolvedConfig::default();
    assert_eq!(apply_cli_overrides(base.clone(), None), base);
    assert_eq!(
        apply_cli_overrides(base.clone(), Some(1)),
        base,
        "Out-of-range CLI base is ignored"
    );
}

#[test]
#[serial(hexgrid_env)]
fn precedence_chain_full_defaults_to_cli() {
    let _base_guard = EnvGuard::new(OFFSET_BASE_ENV);
    let _debounce_guard = EnvGuard::new(DEBOUNCE_ENV);

    let config_file = ConfigFile {
        offset_base: Some(10),
        search_debounce_ms: Some(100),
        ..ConfigFile::default()
    };
    env::set_var(OFFSET_BASE_ENV, "8");

    let resolved = apply_cli_overrides(apply_env_overrides(merge_config(Some(config_file))), Some(2));

    assert_eq!(resolved.offset_base, 2, "CLI wins over env and file");
    assert_eq!(resolved.search_debounce_ms, 100, "File value survives");
}
