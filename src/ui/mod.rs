//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;

use crate::app::App;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (main_area, status_area) = layout::create_layout(frame.area());

    forms::draw_registration(frame, main_area, app);
    layout::draw_status_bar(frame, status_area, app);

    // Error dialog goes on top of everything
    if let Some(error) = app.current_error() {
        components::render_error_dialog(frame, error, app.queued_errors());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockUsersApi;
    use crate::state::FormOptions;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[tokio::test]
    async fn test_draws_every_field() {
        let app = App::with_api(Arc::new(MockUsersApi::new()), FormOptions::default());
        let screen = render(&app);

        for label in [
            "Name",
            "Last Name",
            "Date of Birth",
            "Technology",
            "Version",
            "Email",
            "Hobby 1",
            "Submit",
        ] {
            assert!(screen.contains(label), "missing {label}:\n{screen}");
        }
        assert!(screen.contains("(disabled)"));
    }

    #[tokio::test]
    async fn test_draws_error_dialog() {
        let mut app = App::with_api(Arc::new(MockUsersApi::new()), FormOptions::default());
        app.push_error("Failed to submit registration");
        let screen = render(&app);
        assert!(screen.contains("Failed to submit registration"));
        assert!(screen.contains("to dismiss"));
    }
}
