//! Table widget for the TUI.
//!
//! Renders a frame with bordered column headers, auto-sized columns, and
//! styled missing values.

use crate::dataset::{Frame, Value};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Widget for rendering a frame as a table.
pub struct FrameTable<'a> {
    frame: &'a Frame,
}

impl<'a> FrameTable<'a> {
    pub fn new(frame: &'a Frame) -> Self {
        Self { frame }
    }

    /// Calculates the display width of each column.
    fn calculate_column_widths(&self) -> Vec<usize> {
        self.frame
            .columns()
            .iter()
            .map(|col| {
                col.values
                    .iter()
                    .map(|v| v.to_display_string().chars().count())
                    .fold(col.name.chars().count(), usize::max)
                    .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    /// Truncates a string to `max_width` characters, adding an ellipsis when cut.
    fn truncate(s: &str, max_width: usize) -> String {
        if s.chars().count() <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            s.chars().take(max_width).collect()
        } else {
            let kept: String = s.chars().take(max_width - 3).collect();
            format!("{kept}...")
        }
    }

    /// Renders the table to lines for embedding in the output panel.
    pub fn render_to_lines(&self, available_width: usize) -> Vec<Line<'static>> {
        if self.frame.column_count() == 0 {
            return vec![Line::from(Span::styled(
                format!("({} rows, no columns)", self.frame.row_count()),
                Style::default().fg(Color::DarkGray),
            ))];
        }

        let widths = self.calculate_column_widths();

        // Borders and one space of padding on each side of every cell.
        let total_width: usize = widths.iter().sum::<usize>() + widths.len() * 3 + 1;
        let scale_factor = if total_width > available_width && available_width > 0 {
            available_width as f64 / total_width as f64
        } else {
            1.0
        };
        let widths: Vec<usize> = widths
            .iter()
            .map(|&w| ((w as f64 * scale_factor) as usize).max(MIN_COLUMN_WIDTH))
            .collect();

        let mut lines = Vec::with_capacity(self.frame.row_count() + 4);
        lines.push(Self::render_border(&widths, '┌', '┬', '┐'));
        lines.push(self.render_header_row(&widths));
        lines.push(Self::render_border(&widths, '├', '┼', '┤'));
        for row in (0..self.frame.row_count()).filter_map(|i| self.frame.row(i)) {
            lines.push(Self::render_data_row(&row, &widths));
        }
        lines.push(Self::render_border(&widths, '└', '┴', '┘'));
        lines
    }

    fn render_border(widths: &[usize], left: char, mid: char, right: char) -> Line<'static> {
        let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        let border = format!("{left}{}{right}", inner.join(mid.to_string().as_str()));
        Line::from(Span::styled(border, Style::default().fg(Color::DarkGray)))
    }

    fn render_header_row(&self, widths: &[usize]) -> Line<'static> {
        let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];
        for (col, &width) in self.frame.columns().iter().zip(widths) {
            let name = Self::truncate(&col.name, width);
            spans.push(Span::styled(
                format!(" {name:width$} "),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }
        Line::from(spans)
    }

    fn render_data_row(row: &[&Value], widths: &[usize]) -> Line<'static> {
        let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];
        for (value, &width) in row.iter().zip(widths) {
            let cell = Self::truncate(&value.to_display_string(), width);
            let style = if value.is_null() {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };
            spans.push(Span::styled(format!(" {cell:width$} "), style));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }
        Line::from(spans)
    }
}

impl Widget for FrameTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.render_to_lines(area.width as usize);
        for (i, line) in lines.iter().take(area.height as usize).enumerate() {
            buf.set_line(area.x, area.y + i as u16, line, area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{gold_loans, Column};

    fn sample_frame() -> Frame {
        Frame::new(vec![
            Column::new("id", vec![Value::Int(1), Value::Int(2)]),
            Column::new("name", vec![Value::from("Alice"), Value::from("Bob")]),
            Column::new(
                "email",
                vec![Value::from("alice@test.com"), Value::Null],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_calculate_column_widths() {
        let frame = sample_frame();
        let widths = FrameTable::new(&frame).calculate_column_widths();
        assert_eq!(widths, vec![MIN_COLUMN_WIDTH, 5, 14]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(FrameTable::truncate("hello", 10), "hello");
        assert_eq!(FrameTable::truncate("hello world", 8), "hello...");
        assert_eq!(FrameTable::truncate("hi", 2), "hi");
        assert_eq!(FrameTable::truncate("hello", 3), "hel");
        assert_eq!(FrameTable::truncate("₹₹₹₹₹₹", 5), "₹₹...");
    }

    #[test]
    fn test_render_to_lines() {
        let frame = sample_frame();
        let lines = FrameTable::new(&frame).render_to_lines(80);
        // top border, header, separator, 2 rows, bottom border
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_header_row_names_every_column() {
        let frame = gold_loans().preview(2);
        let lines = FrameTable::new(&frame).render_to_lines(400);
        let header: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        for name in frame.column_names() {
            assert!(header.contains(name), "missing {name} in {header}");
        }
    }

    #[test]
    fn test_no_columns() {
        let frame = Frame::empty_with_rows(3);
        let lines = FrameTable::new(&frame).render_to_lines(80);
        assert_eq!(lines.len(), 1);
    }
}
