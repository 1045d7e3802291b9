//! One questionnaire step: progress, prompt, choices and navigation

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use edi_core::intake::StepView;

use crate::tui::theme::Theme;

pub fn render(frame: &mut Frame, view: &StepView, cursor: usize, language: &str, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Progress
            Constraint::Min(0),    // Question
            Constraint::Length(1), // Navigation
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_title(frame, chunks[0], view, language, theme);
    render_progress(frame, chunks[1], view, theme);
    render_question(frame, chunks[2], view, cursor, theme);
    render_navigation(frame, chunks[3], view, theme);
    render_help(frame, chunks[4]);
}

fn render_title(frame: &mut Frame, area: Rect, view: &StepView, language: &str, theme: &Theme) {
    let title = Line::from(vec![
        Span::styled(" EDI Symptom Checker", theme.title),
        Span::styled(
            format!("  {}  ({} of {})", language, view.index + 1, view.count),
            theme.muted,
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_progress(frame: &mut Frame, area: Rect, view: &StepView, theme: &Theme) {
    let ratio = view.progress.clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .ratio(ratio)
        .label(format!("{}%", (ratio * 100.0).round() as u8))
        .gauge_style(theme.progress);
    frame.render_widget(gauge, area);
}

fn render_question(frame: &mut Frame, area: Rect, view: &StepView, cursor: usize, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" Question {} ", view.index + 1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let prompt_height = (view.prompt.len() as u16 / inner.width.max(1)) + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(prompt_height), Constraint::Min(0)])
        .split(inner);

    let prompt = Paragraph::new(Line::from(Span::styled(
        view.prompt.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .wrap(Wrap { trim: true });
    frame.render_widget(prompt, chunks[0]);

    let items: Vec<ListItem> = view
        .choices
        .iter()
        .enumerate()
        .map(|(idx, choice)| {
            let marker_style = if choice.selected {
                theme.chosen
            } else {
                theme.muted
            };
            let line = Line::from(vec![
                Span::raw(format!(" {}. ", idx + 1)),
                Span::styled(Theme::choice_marker(choice.selected), marker_style),
                Span::raw(" "),
                Span::raw(choice.text.clone()),
            ]);
            let item = ListItem::new(line);
            if idx == cursor {
                item.style(theme.cursor)
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items), chunks[1]);
}

fn render_navigation(frame: &mut Frame, area: Rect, view: &StepView, theme: &Theme) {
    let back_style = if view.back_enabled {
        theme.button
    } else {
        theme.disabled
    };
    let nav = Line::from(vec![
        Span::styled("[← Back]", back_style),
        Span::raw("    "),
        Span::styled(format!("[{} →]", view.next_label), theme.button),
    ]);
    frame.render_widget(Paragraph::new(nav).alignment(Alignment::Center), area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Cyan);
    let sep = Style::default().fg(Color::DarkGray);
    let help_text = Line::from(vec![
        Span::raw(" "),
        Span::styled("↑↓", key),
        Span::raw(" Move  "),
        Span::styled("•", sep),
        Span::raw("  "),
        Span::styled("Space", key),
        Span::raw(" Select  "),
        Span::styled("•", sep),
        Span::raw("  "),
        Span::styled("Enter", key),
        Span::raw(" Next  "),
        Span::styled("•", sep),
        Span::raw("  "),
        Span::styled("←", key),
        Span::raw(" Back  "),
        Span::styled("•", sep),
        Span::raw("  "),
        Span::styled("Esc", key),
        Span::raw(" Quit"),
    ]);

    let help = Paragraph::new(help_text).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(help, area);
}
