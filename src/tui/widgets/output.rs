//! Output panel widget for the TUI.
//!
//! Renders the session transcript: each question followed by the blocks of
//! its pipeline output, with notices styled by severity.

use super::table::FrameTable;
use crate::output::{Block as OutputBlock, NoticeLevel};
use crate::tui::app::Entry;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Output panel widget.
pub struct OutputPanel<'a> {
    entries: &'a [Entry],
    /// Lines scrolled up from the bottom.
    scroll: usize,
}

impl<'a> OutputPanel<'a> {
    pub fn new(entries: &'a [Entry], scroll: usize) -> Self {
        Self { entries, scroll }
    }

    /// Builds every transcript line for a panel of the given inner width.
    pub fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                lines.push(Line::from(""));
            }
            match entry {
                Entry::Question(text) => {
                    let style = Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD);
                    for (j, chunk) in wrap_text(text, width.saturating_sub(2)).into_iter().enumerate() {
                        let prefix = if j == 0 { "> " } else { "  " };
                        lines.push(Line::from(Span::styled(format!("{prefix}{chunk}"), style)));
                    }
                }
                Entry::Output(output) => {
                    for block in &output.blocks {
                        push_block(&mut lines, block, width);
                    }
                }
            }
        }
        lines
    }
}

fn notice_style(level: NoticeLevel) -> (&'static str, Style) {
    match level {
        NoticeLevel::Info => ("ℹ ", Style::default().fg(Color::Blue)),
        NoticeLevel::Success => ("✔ ", Style::default().fg(Color::Green)),
        NoticeLevel::Warning => ("⚠ ", Style::default().fg(Color::Yellow)),
        NoticeLevel::Error => (
            "✖ ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    }
}

fn push_block(lines: &mut Vec<Line<'static>>, block: &OutputBlock, width: usize) {
    match block {
        OutputBlock::Heading(text) => lines.push(Line::from(Span::styled(
            text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        OutputBlock::Notice(level, text) => {
            let (icon, style) = notice_style(*level);
            for (i, chunk) in wrap_text(text, width.saturating_sub(2)).into_iter().enumerate() {
                let prefix = if i == 0 { icon } else { "  " };
                lines.push(Line::from(Span::styled(format!("{prefix}{chunk}"), style)));
            }
        }
        OutputBlock::Table(frame) => lines.extend(FrameTable::new(frame).render_to_lines(width)),
        OutputBlock::Code(code) => {
            let style = Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::DIM);
            for chunk in wrap_text(code, width.saturating_sub(2)) {
                lines.push(Line::from(Span::styled(format!("  {chunk}"), style)));
            }
        }
    }
}

/// Greedy word wrap on character counts. Words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if current_len > 0 {
                    out.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                out.push(word.drain(..width).collect());
            }
            let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
            if needed > width && current_len > 0 {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }
        out.push(current);
    }
    out
}

impl Widget for OutputPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Output ");

        let inner_width = area.width.saturating_sub(2) as usize;
        let inner_height = area.height.saturating_sub(2) as usize;
        let lines = self.build_lines(inner_width);

        let max_scroll = lines.len().saturating_sub(inner_height);
        let top = max_scroll - self.scroll.min(max_scroll);

        Paragraph::new(lines)
            .block(block)
            .scroll((top as u16, 0))
            .render(area, buf);
    }
}
