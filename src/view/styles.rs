//! Grid styling configuration.
//!
//! Distinct styles for the cursor, selection, search matches and byte
//! classes. Every highlight keeps a modifier so it stays visible without color.

use crate::model::ByteClass;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== GridStyles =====

/// Per-cell highlight of a byte, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Under the cursor.
    Cursor,
    /// Inside the currently selected match.
    SelectedMatch,
    /// Inside any other match.
    Match,
    /// Inside the selection.
    Selection,
    /// No highlight.
    None,
}

/// Styles for every element of the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridStyles {
    offset: Style,
    null_byte: Style,
    non_printable: Style,
    higher: Style,
    cursor: Style,
    selected_match: Style,
    matched: Style,
    selection: Style,
    fold: Style,
    /// Status bar background.
    pub status: Style,
    /// Search bar border while focused.
    pub focused_border: Style,
    /// Search input caret.
    pub caret: Style,
}

impl GridStyles {
    /// Styles for the given color configuration.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let base = Self {
            offset: Style::default(),
            null_byte: Style::default(),
            non_printable: Style::default(),
            higher: Style::default(),
            cursor: Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
            selected_match: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            matched: Style::default().add_modifier(Modifier::UNDERLINED),
            selection: Style::default().add_modifier(Modifier::REVERSED),
            fold: Style::default().add_modifier(Modifier::ITALIC),
            status: Style::default().add_modifier(Modifier::REVERSED),
            focused_border: Style::default().add_modifier(Modifier::BOLD),
            caret: Style::default().add_modifier(Modifier::REVERSED),
        };
        if !config.colors_enabled() {
            return base;
        }
        Self {
            offset: base.offset.fg(Color::DarkGray),
            null_byte: base.null_byte.fg(Color::DarkGray),
            non_printable: base.non_printable.fg(Color::Cyan),
            higher: base.higher.fg(Color::Magenta),
            cursor: base.cursor.fg(Color::Black).bg(Color::Yellow),
            selected_match: base.selected_match.fg(Color::Black).bg(Color::LightRed),
            matched: base.matched.fg(Color::Black).bg(Color::LightMagenta),
            selection: Style::default().fg(Color::White).bg(Color::Blue),
            fold: base.fold.fg(Color::DarkGray),
            status: Style::default().fg(Color::Black).bg(Color::Gray),
            focused_border: base.focused_border.fg(Color::Yellow),
            caret: Style::default().fg(Color::Black).bg(Color::White),
        }
    }

    /// Offset label style.
    pub fn offset(&self) -> Style {
        self.offset
    }

    /// Fold placeholder style.
    pub fn fold(&self) -> Style {
        self.fold
    }

    /// Style for a byte of class `class` carrying `highlight`.
    pub fn byte(&self, class: ByteClass, highlight: Highlight) -> Style {
        match highlight {
            Highlight::Cursor => self.cursor,
            Highlight::SelectedMatch => self.selected_match,
            Highlight::Match => self.matched,
            Highlight::Selection => self.selection,
            Highlight::None => match class {
                ByteClass::Null => self.null_byte,
                ByteClass::Printable => Style::default(),
                ByteClass::NonPrintable => self.non_printable,
                ByteClass::Higher => self.higher,
            },
        }
    }
}

impl Default for GridStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // ===== ColorConfig Tests =====

    #[test]
    #[serial(no_color)]
    fn color_config_respects_no_color_flag() {
        let config = ColorConfig::from_env_and_args(true);
        assert!(
            !config.colors_enabled(),
            "--no-color flag should disable colors"
        );
    }

    #[test]
    #[serial(no_color)]
    fn color_config_respects_no_color_env_var() {
        std::env::set_var("NO_COLOR", "1");
        let config = ColorConfig::from_env_and_args(false);
        std::env::remove_var("NO_COLOR");
        assert!(!config.colors_enabled(), "NO_COLOR should disable colors");
    }

    #[test]
    #[serial(no_color)]
    fn color_config_enables_colors_by_default() {
        std::env::remove_var("NO_COLOR");
        let config = ColorConfig::from_env_and_args(false);
        assert!(config.colors_enabled());
    }

    // ===== GridStyles Tests =====

    #[test]
    fn highlights_differ_from_each_other() {
        let styles = GridStyles::with_color_config(ColorConfig { enabled: true });
        let class = ByteClass::Printable;
        let all = [
            styles.byte(class, Highlight::Cursor),
            styles.byte(class, Highlight::SelectedMatch),
            styles.byte(class, Highlight::Match),
            styles.byte(class, Highlight::Selection),
            styles.byte(class, Highlight::None),
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn no_color_keeps_highlights_visible_without_colors() {
        let styles = GridStyles::with_color_config(ColorConfig { enabled: false });
        let cursor = styles.byte(ByteClass::Printable, Highlight::Cursor);
        assert_eq!(cursor.fg, None);
        assert_eq!(cursor.bg, None);
        assert!(cursor.add_modifier.contains(Modifier::REVERSED));
        assert_eq!(
            styles.byte(ByteClass::Null, Highlight::None),
            Style::default()
        );
    }

    #[test]
    fn byte_classes_are_colored_when_enabled() {
        let styles = GridStyles::with_color_config(ColorConfig { enabled: true });
        assert_eq!(
            styles.byte(ByteClass::Null, Highlight::None).fg,
            Some(Color::DarkGray)
        );
        assert_eq!(
            styles.byte(ByteClass::Printable, Highlight::None),
            Style::default()
        );
    }
}
