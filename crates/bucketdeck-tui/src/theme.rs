//! Terminal styles for the dialog and the status line.

use ratatui::style::{Color, Modifier, Style};

use bucketdeck_ops::StatusLevel;

// Slate palette
const SLATE_50: Color = Color::Rgb(248, 250, 252);
const SLATE_100: Color = Color::Rgb(241, 245, 249);
const SLATE_400: Color = Color::Rgb(148, 163, 184);
const SLATE_500: Color = Color::Rgb(100, 116, 139);
const SLATE_600: Color = Color::Rgb(71, 85, 105);
const SLATE_700: Color = Color::Rgb(51, 65, 85);
const SLATE_800: Color = Color::Rgb(30, 41, 59);

// Accents
const BLUE_400: Color = Color::Rgb(96, 165, 250);
const BLUE_600: Color = Color::Rgb(37, 99, 235);
const GREEN_500: Color = Color::Rgb(34, 197, 94);
const YELLOW_500: Color = Color::Rgb(234, 179, 8);
const RED_500: Color = Color::Rgb(239, 68, 68);

/// Styles used by every widget.
#[derive(Debug, Clone)]
pub struct Theme {
    pub text: Style,

    // Dialog chrome
    pub border: Style,
    pub title: Style,
    pub message: Style,
    /// Applied over the whole screen behind an open dialog.
    pub backdrop: Style,
    /// Border while the dialog settles after resolving.
    pub closing: Style,

    // Buttons
    pub button: Style,
    pub button_focused: Style,

    // Text field
    pub input: Style,
    pub input_focused: Style,
    pub input_selected: Style,
    pub placeholder: Style,
    pub cursor: Style,

    pub help_key: Style,
    pub help_desc: Style,

    pub success: Style,
    pub warning: Style,
    pub error: Style,
}

impl Theme {
    /// Style for a status line message.
    pub fn status_style(&self, level: StatusLevel) -> Style {
        match level {
            StatusLevel::Neutral => self.text,
            StatusLevel::Success => self.success,
            StatusLevel::Warning => self.warning,
            StatusLevel::Error => self.error,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Style::new().fg(SLATE_100),

            border: Style::new().fg(SLATE_600),
            title: Style::new().fg(BLUE_400).add_modifier(Modifier::BOLD),
            message: Style::new().fg(SLATE_100),
            backdrop: Style::new().fg(SLATE_600).add_modifier(Modifier::DIM),
            closing: Style::new().fg(SLATE_500).add_modifier(Modifier::DIM),

            button: Style::new().bg(SLATE_700).fg(SLATE_100),
            button_focused: Style::new()
                .bg(BLUE_600)
                .fg(SLATE_50)
                .add_modifier(Modifier::BOLD),

            input: Style::new().bg(SLATE_800).fg(SLATE_100),
            input_focused: Style::new().bg(SLATE_800).fg(SLATE_50),
            input_selected: Style::new().bg(BLUE_600).fg(SLATE_50),
            placeholder: Style::new().bg(SLATE_800).fg(SLATE_500),
            cursor: Style::new().add_modifier(Modifier::REVERSED),

            help_key: Style::new().fg(BLUE_400).add_modifier(Modifier::BOLD),
            help_desc: Style::new().fg(SLATE_400),

            success: Style::new().fg(GREEN_500).add_modifier(Modifier::BOLD),
            warning: Style::new().fg(YELLOW_500).add_modifier(Modifier::BOLD),
            error: Style::new().fg(RED_500).add_modifier(Modifier::BOLD),
        }
    }
}
