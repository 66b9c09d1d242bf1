//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::App;
use super::widgets::{header, input, output};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Output
            Constraint::Length(3), // Input
        ])
        .split(frame.area());

    render_header(frame, layout[0], app);
    render_output(frame, layout[1], app);
    render_input(frame, layout[2], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let widget = header::Header::new(app.dataset_name.as_deref(), app.spinner.as_ref());
    frame.render_widget(widget, area);
}

fn render_output(frame: &mut Frame, area: Rect, app: &App) {
    frame.render_widget(output::OutputPanel::new(&app.entries, app.scroll), area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let enabled = app.query_enabled();
    let widget = input::InputBar::new(&app.input.text, app.input.cursor, enabled, app.is_busy());
    frame.render_widget(widget, area);

    if enabled && !app.is_busy() {
        // Border (1) + prompt "> " (2)
        let visible = app.input.cursor.min(input::InputBar::available_width(area));
        let cursor_x = area.x + 1 + 2 + visible as u16;
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::gold_loans;
    use crate::output::Output;
    use crate::tui::app::Entry;
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_loaded_dataset_preview() {
        let dataset = gold_loans();
        let app = App::new(Some(dataset.name()), Output::loaded(&dataset, 3));
        let screen = render_to_string(&app, 200, 20);
        assert!(screen.contains("loaded successfully!"));
        assert!(screen.contains("Customer Name"));
        assert!(screen.contains("Ask a question"));
    }

    #[test]
    fn test_render_without_dataset() {
        let app = App::new(None, Output::error("Error: The file 'x.xlsx' was not found."));
        let screen = render_to_string(&app, 100, 12);
        assert!(screen.contains("[no dataset]"));
        assert!(screen.contains("was not found"));
        assert!(screen.contains("No dataset loaded"));
    }

    #[test]
    fn test_render_answer_and_spinner() {
        let mut app = App::new(Some("GoldLoan.xlsx"), Output::info("ready"));
        app.begin_request("What is the total gold weight?");
        let screen = render_to_string(&app, 120, 12);
        assert!(screen.contains("Thinking"));
        assert!(screen.contains("> What is the total gold weight?"));

        app.finish_request(Output::warning("Request cancelled."));
        app.push(Entry::Question("again".to_string()));
        let screen = render_to_string(&app, 120, 12);
        assert!(!screen.contains("Thinking"));
        assert!(screen.contains("Request cancelled."));
    }
}
