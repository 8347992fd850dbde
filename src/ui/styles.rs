// UI Styles
// Color scheme for the sync report

use ratatui::style::{Color, Modifier, Style};

/// Report color scheme and styles
pub struct Styles;

impl Styles {
    // === Frame ===

    pub fn title() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Color::Rgb(102, 102, 102))
    }

    pub fn table_header() -> Style {
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD)
    }

    // === Columns ===

    pub fn action() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn path() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn reason() -> Style {
        Style::default().fg(Color::Yellow)
    }
}
