//! Log level and chrome styling.

use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Whether colors are enabled.
///
/// Disabled by the `--no-color` flag or any `NO_COLOR` environment value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Resolve from the CLI flag and `NO_COLOR`.
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Colors on, regardless of environment.
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    /// `false` under `Never`.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== LogStyles =====

/// Styles for entry rows and the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogStyles {
    error: Style,
    warn: Style,
    debug: Style,
    gutter: Style,
    selected: Style,
    following: Style,
}

impl LogStyles {
    /// Styles for an explicit color choice.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                error: Style::default().fg(Color::Red),
                warn: Style::default().fg(Color::Yellow),
                debug: Style::default().fg(Color::DarkGray),
                gutter: Style::default().fg(Color::DarkGray),
                selected: Style::default().add_modifier(Modifier::REVERSED),
                following: Style::default().fg(Color::Green),
            }
        } else {
            // Selection stays visible without color.
            Self {
                error: Style::default(),
                warn: Style::default(),
                debug: Style::default(),
                gutter: Style::default(),
                selected: Style::default().add_modifier(Modifier::REVERSED),
                following: Style::default(),
            }
        }
    }

    /// Text style for an entry's `level` field (case-insensitive).
    pub fn style_for_level(&self, level: &str) -> Style {
        match level.to_ascii_lowercase().as_str() {
            "error" | "fatal" | "critical" => self.error,
            "warn" | "warning" => self.warn,
            "debug" | "trace" => self.debug,
            _ => Style::default(),
        }
    }

    /// Style of the gutter columns.
    pub fn gutter(&self) -> Style {
        self.gutter
    }

    /// Style of the selected line.
    pub fn selected(&self) -> Style {
        self.selected
    }

    /// Style of the FOLLOW indicator.
    pub fn following(&self) -> Style {
        self.following
    }
}

impl Default for LogStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::enabled())
    }
}
