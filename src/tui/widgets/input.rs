//! Input widget for the TUI.
//!
//! Single-line question field. Disabled when no dataset is loaded.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Placeholder shown when the query interface is unavailable.
pub const DISABLED_PLACEHOLDER: &str = "No dataset loaded. Restart with a dataset path or --sample.";

/// Calculates how many characters to skip so the cursor stays visible.
pub fn calculate_scroll_offset(cursor: usize, available_width: usize) -> usize {
    cursor.saturating_sub(available_width)
}

/// Input bar widget.
pub struct InputBar<'a> {
    text: &'a str,
    cursor: usize,
    enabled: bool,
    busy: bool,
}

impl<'a> InputBar<'a> {
    /// `cursor` is a character index into `text`.
    pub fn new(text: &'a str, cursor: usize, enabled: bool, busy: bool) -> Self {
        Self {
            text,
            cursor,
            enabled,
            busy,
        }
    }

    /// Characters available for text: borders (2), prompt (2), cursor (1).
    pub fn available_width(area: Rect) -> usize {
        area.width.saturating_sub(5) as usize
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.enabled && !self.busy {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Ask a question ");

        let line = if self.enabled {
            let prompt_style = Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD);
            let offset = calculate_scroll_offset(self.cursor, Self::available_width(area));
            let visible: String = self.text.chars().skip(offset).collect();
            Line::from(vec![Span::styled("> ", prompt_style), Span::raw(visible)])
        } else {
            Line::from(Span::styled(
                DISABLED_PLACEHOLDER,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))
        };

        Paragraph::new(line).block(block).render(area, buf);
    }
}
