//! Field rendering utilities for forms

use crate::state::{FieldState, FieldStatus};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Border color for a field: errors only show once the user has touched it
fn border_color(field: &FieldState, is_active: bool) -> Color {
    match field.status() {
        FieldStatus::Invalid if field.touched => Color::Red,
        FieldStatus::Disabled => Color::DarkGray,
        _ if is_active => Color::Cyan,
        _ => Color::DarkGray,
    }
}

/// Footer under the field box
fn status_line(field: &FieldState) -> Option<Span<'static>> {
    match field.status() {
        FieldStatus::Pending => Some(Span::styled(
            " checking… ",
            Style::default().fg(Color::Yellow),
        )),
        FieldStatus::Invalid if field.touched => field
            .first_error()
            .map(|e| Span::styled(format!(" {e} "), Style::default().fg(Color::Red))),
        _ => None,
    }
}

/// Draw a form field using FieldState from the domain layer
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FieldState, is_active: bool) {
    render_field(frame, area, &field.label, field, is_active, None);
}

/// Draw a select field; the hint shows while it has focus
pub fn draw_select_field(frame: &mut Frame, area: Rect, field: &FieldState, is_active: bool) {
    render_field(frame, area, &field.label, field, is_active, Some("◀ ▶ to choose"));
}

/// Draw one entry of the hobby list, numbered from 1
pub fn draw_hobby_field(
    frame: &mut Frame,
    area: Rect,
    index: usize,
    field: &FieldState,
    is_active: bool,
) {
    let title = format!("{} {}", field.label, index + 1);
    render_field(frame, area, &title, field, is_active, None);
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    field: &FieldState,
    is_active: bool,
    hint: Option<&str>,
) {
    let style = if !field.is_enabled() {
        Style::default().fg(Color::DarkGray)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let display_value = match field.value() {
        "" if !field.is_enabled() => "(disabled)",
        "" if !is_active => "(empty)",
        value => value,
    };

    let cursor = if is_active { "▌" } else { "" };

    let mut spans = vec![
        Span::styled(display_value.to_string(), style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ];
    if let Some(hint) = hint.filter(|_| is_active) {
        spans.push(Span::styled(
            format!("  {hint}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(field, is_active)));
    if let Some(status) = status_line(field) {
        block = block.title_bottom(Line::from(status));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
