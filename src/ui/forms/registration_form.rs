//! Registration form rendering

use super::field_renderer::{draw_field, draw_hobby_field, draw_select_field};
use crate::app::{App, Focus};
use crate::platform::{ADD_HOBBY_SHORTCUT, REMOVE_HOBBY_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::{FieldKey, RegistrationForm};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Height of one bordered single-line field
const FIELD_HEIGHT: u16 = 3;

/// Draw the registration form
pub fn draw_registration(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Register ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let Some(form) = app.form() else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Fields
            Constraint::Length(2), // Help text
        ])
        .margin(1)
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[0]);

    draw_details(frame, columns[0], form, app.focus);
    draw_hobbies(frame, columns[1], form, app.focus);
    draw_help_text(frame, rows[1]);
}

/// Personal details column
fn draw_details(frame: &mut Frame, area: Rect, form: &RegistrationForm, focus: Focus) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            FieldKey::SCALARS
                .iter()
                .map(|_| Constraint::Length(FIELD_HEIGHT))
                .chain([Constraint::Min(0)]),
        )
        .split(area);

    for (key, chunk) in FieldKey::SCALARS.iter().zip(chunks.iter()) {
        let Some(field) = form.field(*key) else {
            continue;
        };
        let is_active = focus == Focus::Field(*key);
        if key.is_select() {
            draw_select_field(frame, *chunk, field, is_active);
        } else {
            draw_field(frame, *chunk, field, is_active);
        }
    }
}

/// First hobby to show so the focused one stays on screen
fn hobby_scroll(focused: Option<usize>, visible: usize) -> usize {
    match focused {
        Some(index) if visible > 0 && index >= visible => index + 1 - visible,
        _ => 0,
    }
}

/// Hobbies column followed by the submit button
fn draw_hobbies(frame: &mut Frame, area: Rect, form: &RegistrationForm, focus: Focus) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),                // Hobby list
            Constraint::Length(BUTTON_HEIGHT), // Submit
        ])
        .split(area);

    let visible = (chunks[0].height / FIELD_HEIGHT) as usize;
    let focused = match focus {
        Focus::Field(FieldKey::Hobby(index)) => Some(index),
        _ => None,
    };
    let start = hobby_scroll(focused, visible);

    for (row, (index, hobby)) in form
        .hobbies()
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .enumerate()
    {
        let slot = Rect {
            y: chunks[0].y + row as u16 * FIELD_HEIGHT,
            height: FIELD_HEIGHT,
            ..chunks[0]
        };
        draw_hobby_field(frame, slot, index, hobby, focused == Some(index));
    }

    let label = if form.is_valid() {
        "Submit"
    } else {
        "Submit (form incomplete)"
    };
    render_button(frame, chunks[1], label, focus == Focus::Submit, form.is_valid());
}

/// Draw help text for the form
fn draw_help_text(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let help = Paragraph::new(Line::from(vec![
        Span::styled("Tab", key_style),
        Span::raw(": next  "),
        Span::styled(SUBMIT_SHORTCUT, key_style),
        Span::raw(": submit  "),
        Span::styled(ADD_HOBBY_SHORTCUT, key_style),
        Span::raw(": add hobby  "),
        Span::styled(REMOVE_HOBBY_SHORTCUT, key_style),
        Span::raw(": remove hobby  "),
        Span::styled("Esc", key_style),
        Span::raw(": quit"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_keeps_focused_hobby_visible() {
        assert_eq!(hobby_scroll(None, 3), 0);
        assert_eq!(hobby_scroll(Some(2), 3), 0);
        assert_eq!(hobby_scroll(Some(3), 3), 1);
        assert_eq!(hobby_scroll(Some(7), 3), 5);
        assert_eq!(hobby_scroll(Some(4), 0), 0);
    }
}
