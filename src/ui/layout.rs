//! Layout components (content area, status bar)

use crate::app::{App, Focus};
use crate::state::{FieldKey, FieldStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into content and a one-line status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    // Overall form validity
    let form_status = match app.form() {
        Some(form) if form.is_valid() => Span::styled(" ● ready ", Style::default().fg(Color::Green)),
        Some(form) if form.status(FieldKey::Email) == Some(FieldStatus::Pending) => {
            Span::styled(" ◌ checking email ", Style::default().fg(Color::Yellow))
        }
        _ => Span::styled(" ○ incomplete ", Style::default().fg(Color::Red)),
    };
    spans.push(form_status);

    // Focus-specific hints
    spans.push(Span::styled(
        focus_hints(app.focus),
        Style::default().fg(Color::DarkGray),
    ));

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Quit hint on the right
    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        width: (quit_hint.len() as u16).min(area.width),
        ..area
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for the focused element
fn focus_hints(focus: Focus) -> &'static str {
    match focus {
        Focus::Field(key) if key.is_select() => "←/→:choose  ⌫:clear  Tab:next",
        Focus::Field(FieldKey::DateOfBirth) => "yyyy-mm-dd, yyyy/mm/dd or dd.mm.yyyy",
        Focus::Field(FieldKey::Hobby(_)) => "type:edit  Tab:next",
        Focus::Field(_) => "type:edit  ⌫:delete  Tab:next",
        Focus::Submit => "Enter:submit  Shift+Tab:back",
    }
}
