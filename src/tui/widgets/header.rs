//! Header widget for the TUI.
//!
//! Displays the application name, the loaded dataset, and the spinner while
//! a question is in flight.

use super::spinner::Spinner;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    dataset: Option<&'a str>,
    spinner: Option<&'a Spinner>,
}

impl<'a> Header<'a> {
    pub fn new(dataset: Option<&'a str>, spinner: Option<&'a Spinner>) -> Self {
        Self { dataset, spinner }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_text = format!(" askframe v{}", env!("CARGO_PKG_VERSION"));
        buf.set_span(area.x, area.y, &Span::styled(left_text, style), area.width);

        if let Some(spinner) = self.spinner {
            let text = spinner.display();
            let width = text.chars().count() as u16;
            let x = area.x + area.width.saturating_sub(width) / 2;
            buf.set_string(x, area.y, &text, style.fg(Color::Yellow));
        }

        let (dot, dot_color, label) = match self.dataset {
            Some(name) => ("●", Color::Green, format!(" [data: {name}] ")),
            None => ("○", Color::Gray, " [no dataset] ".to_string()),
        };
        let right_width = (label.chars().count() + 2) as u16;
        if right_width < area.width {
            let right_x = area.right().saturating_sub(right_width);
            buf.set_string(right_x, area.y, " ", style);
            buf.set_string(right_x + 1, area.y, dot, style.fg(dot_color));
            buf.set_string(right_x + 2, area.y, &label, style);
        }
    }
}
