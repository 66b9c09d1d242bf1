//! Presentation-agnostic pipeline output.
//!
//! Every pipeline outcome, success or failure, becomes an [`Output`]: an
//! ordered list of blocks (headings, notices, tables, code). The TUI and the
//! one-shot printer each render blocks in their own way.

use crate::dataset::{Dataset, Frame};
use crate::error::{ArtifactError, AskError, LoadError};
use crate::query::QueryValue;

pub const NO_DATA_MATCHED: &str = "No data matched your query.";
pub const NO_SPECIFIC_RESULT: &str =
    "The query was processed, but no specific data was returned. Please try rephrasing your question.";
pub const NO_EXPRESSION: &str =
    "Could not generate a valid query from your question. Please try rephrasing.";

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One renderable piece of output.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Section heading ("Here is your answer:").
    Heading(String),
    /// Styled message.
    Notice(NoticeLevel, String),
    /// Tabular data.
    Table(Frame),
    /// Source code shown verbatim.
    Code(String),
}

/// Ordered output of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Output {
    pub blocks: Vec<Block>,
}

impl Output {
    fn push(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    fn notice(self, level: NoticeLevel, msg: impl Into<String>) -> Self {
        self.push(Block::Notice(level, msg.into()))
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self::default().notice(NoticeLevel::Info, msg)
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::default().notice(NoticeLevel::Warning, msg)
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::default().notice(NoticeLevel::Error, msg)
    }

    /// Success notice plus a preview of the first rows.
    pub fn loaded(dataset: &Dataset, preview_rows: usize) -> Self {
        Self::default()
            .notice(
                NoticeLevel::Success,
                format!("Dataset '{}' loaded successfully!", dataset.name()),
            )
            .push(Block::Heading("Here's a preview of your data:".to_string()))
            .push(Block::Table(dataset.preview(preview_rows)))
    }

    /// The oracle answered, but with no expression.
    pub fn no_expression() -> Self {
        Self::warning(NO_EXPRESSION)
    }

    /// Chooses a presentation for an evaluated value.
    ///
    /// Priority: non-empty table, empty table, plain value, none. A series
    /// is shown as a one-column table.
    pub fn classify(value: QueryValue) -> Self {
        let frame = match value {
            QueryValue::Table(frame) => frame,
            QueryValue::Series(series) => series.to_frame(),
            QueryValue::None => return Self::info(NO_SPECIFIC_RESULT),
            other => {
                return Self::default()
                    .push(Block::Heading("Here is your answer:".to_string()))
                    .notice(
                        NoticeLevel::Success,
                        format!("The result is: {}", other.to_display_string()),
                    )
            }
        };

        if frame.is_empty() {
            return Self::info(NO_DATA_MATCHED);
        }
        let rows = frame.row_count();
        Self::default()
            .push(Block::Heading("Here is your extracted data:".to_string()))
            .push(Block::Table(frame))
            .notice(NoticeLevel::Success, format!("{rows} rows matched your query."))
    }

    /// Converts a pipeline failure into notices.
    pub fn from_error(err: &AskError) -> Self {
        match err {
            AskError::Load(LoadError::NotFound(path)) => Self::error(format!(
                "Error: The file '{path}' was not found. Please check the path and try again."
            )),
            AskError::Load(LoadError::Malformed { path, reason }) => Self::error(format!(
                "Error reading file '{path}': {reason}. Please ensure it's a valid spreadsheet or CSV file."
            )),
            AskError::Transport(msg) => Self::error(format!(
                "Error communicating with the Gemini API. Please check your internet connection or API key. Details: {msg}"
            )),
            AskError::Artifact(ArtifactError::Envelope(detail)) => Self::error(format!(
                "The model did not return a valid structured response. Please try again. Details: {detail}"
            )),
            AskError::Artifact(ArtifactError::Payload(detail)) => Self::error(format!(
                "Failed to parse the JSON response from the model. It might have returned malformed JSON. Details: {detail}"
            )),
            AskError::Evaluation {
                message,
                expression,
            } => Self::error(format!(
                "An error occurred while executing the generated query. Please try rephrasing your question. Error: {message}"
            ))
            .push(Block::Code(format!(
                "Generated code (for debugging): {expression}"
            ))),
            AskError::EmptyInput => Self::warning(err.to_string()),
            AskError::Timeout(secs) => Self::error(format!(
                "The request timed out after {secs}s. Please try again."
            )),
            AskError::Cancelled => Self::warning("Request cancelled."),
            AskError::Config(_) | AskError::Internal(_) => Self::error(err.to_string()),
        }
    }

    /// Highest severity among the notices, if any.
    pub fn level(&self) -> Option<NoticeLevel> {
        let rank = |level: &NoticeLevel| match level {
            NoticeLevel::Info => 0,
            NoticeLevel::Success => 1,
            NoticeLevel::Warning => 2,
            NoticeLevel::Error => 3,
        };
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Notice(level, _) => Some(*level),
                _ => None,
            })
            .max_by_key(rank)
    }

    /// Plain-text rendering used by one-shot mode.
    pub fn to_plain_text(&self) -> String {
        let mut out = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            out.push(match block {
                Block::Heading(text) => text.clone(),
                Block::Notice(NoticeLevel::Info, text) => format!("[info] {text}"),
                Block::Notice(NoticeLevel::Success, text) => format!("[ok] {text}"),
                Block::Notice(NoticeLevel::Warning, text) => format!("[warning] {text}"),
                Block::Notice(NoticeLevel::Error, text) => format!("[error] {text}"),
                Block::Table(frame) => format_table(frame),
                Block::Code(code) => format!("    {code}"),
            });
        }
        out.join("\n")
    }
}

/// Formats a frame as an aligned text table.
pub fn format_table(frame: &Frame) -> String {
    if frame.column_count() == 0 {
        return format!("({} rows, no columns)", frame.row_count());
    }

    let headers: Vec<&str> = frame.column_names();
    let rows: Vec<Vec<String>> = (0..frame.row_count())
        .filter_map(|i| frame.row(i))
        .map(|row| row.iter().map(|v| v.to_display_string()).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let pad = |cell: &str, width: usize| {
        let fill = width.saturating_sub(cell.chars().count());
        format!("{cell}{}", " ".repeat(fill))
    };

    let mut output = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| pad(h, w))
        .collect();
    output.push_str(&header_line.join(" │ "));
    output.push('\n');

    let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    output.push_str(&separator.join("─┼─"));
    output.push('\n');

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| pad(cell, w))
            .collect();
        output.push_str(line.join(" │ ").trim_end());
        output.push('\n');
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{gold_loans, Column, Value};
    use crate::query::Series;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scalar_is_labeled_answer() {
        let output = Output::classify(QueryValue::Scalar(Value::Float(250000.0)));
        assert_eq!(
            output.blocks,
            vec![
                Block::Heading("Here is your answer:".to_string()),
                Block::Notice(
                    NoticeLevel::Success,
                    "The result is: 250000.0".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_table_reports_row_count() {
        let frame = gold_loans().frame().head(2);
        let output = Output::classify(QueryValue::Table(frame));
        assert!(matches!(output.blocks[1], Block::Table(_)));
        assert_eq!(
            output.blocks[2],
            Block::Notice(NoticeLevel::Success, "2 rows matched your query.".to_string())
        );
    }

    #[test]
    fn test_empty_table_is_not_an_error() {
        let frame = gold_loans().frame().head(0);
        let output = Output::classify(QueryValue::Table(frame));
        assert_eq!(output.level(), Some(NoticeLevel::Info));
        assert_eq!(
            output.blocks,
            vec![Block::Notice(NoticeLevel::Info, NO_DATA_MATCHED.to_string())]
        );
    }

    #[test]
    fn test_series_is_tabular() {
        let series = Series::new("size", vec![Value::Int(5), Value::Int(3)])
            .with_index(Column::new("Loan Status", vec![Value::from("Active"), Value::from("Closed")]));
        let output = Output::classify(QueryValue::Series(series));
        match &output.blocks[1] {
            Block::Table(frame) => assert_eq!(frame.column_names(), vec!["Loan Status", "size"]),
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_none_is_neutral_notice() {
        let output = Output::classify(QueryValue::None);
        assert_eq!(output, Output::info(NO_SPECIFIC_RESULT));
    }

    #[test]
    fn test_evaluation_error_echoes_expression() {
        let err = AskError::evaluation("name 'os' is not allowed", "os.system('ls')");
        let output = Output::from_error(&err);
        assert_eq!(output.level(), Some(NoticeLevel::Error));
        assert_eq!(
            output.blocks[1],
            Block::Code("Generated code (for debugging): os.system('ls')".to_string())
        );
    }

    #[test]
    fn test_transport_and_artifact_errors_are_distinct() {
        let transport = Output::from_error(&AskError::transport("status 500"));
        let artifact = Output::from_error(&AskError::Artifact(ArtifactError::Payload(
            "expected value".to_string(),
        )));
        assert_ne!(transport, artifact);
        assert!(transport.to_plain_text().contains("communicating with the Gemini API"));
        assert!(artifact.to_plain_text().contains("malformed JSON"));
    }

    #[test]
    fn test_empty_input_is_warning() {
        let output = Output::from_error(&AskError::EmptyInput);
        assert_eq!(
            output,
            Output::warning("Please enter a question to get an answer.")
        );
    }

    #[test]
    fn test_format_table_alignment() {
        let frame = Frame::new(vec![
            Column::new("Name", vec![Value::from("Alice"), Value::from("Bo")]),
            Column::new("Age", vec![Value::Int(30), Value::Null]),
        ])
        .unwrap();
        let text = format_table(&frame);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name  │ Age");
        assert_eq!(lines[2], "Alice │ 30");
        assert_eq!(lines[3], "Bo    │ NaN");
    }
}
