use ratatui::style::{Color, Modifier, Style};

/// Consistent theme for the TUI
pub struct Theme {
    pub title: Style,
    pub cursor: Style,
    pub chosen: Style,
    pub button: Style,
    pub disabled: Style,
    pub notice: Style,
    pub progress: Style,
    pub muted: Style,
    pub modal_border: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            cursor: Style::default()
                .bg(Color::Rgb(50, 50, 80))
                .add_modifier(Modifier::BOLD),
            chosen: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            button: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(Color::DarkGray),
            notice: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            progress: Style::default().fg(Color::Green).bg(Color::Black),
            muted: Style::default().fg(Color::DarkGray),
            modal_border: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }
}

impl Theme {
    /// Radio marker for a choice
    pub fn choice_marker(selected: bool) -> &'static str {
        if selected {
            "(•)"
        } else {
            "( )"
        }
    }
}
