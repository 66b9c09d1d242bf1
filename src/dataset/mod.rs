//! Dataset layer for askframe.
//!
//! Holds the in-memory table a session queries, along with the loader that
//! reads it from disk and the schema summary sent to the model.

mod frame;
mod loader;
pub mod sample;
mod schema;
mod types;

pub use frame::{Column, Frame};
pub use loader::{excel_serial_to_value, load};
pub use sample::gold_loans;
pub use schema::{ColumnSummary, Schema};
pub use types::{ColumnType, Value};

/// An immutable, named table loaded once per session.
///
/// Query evaluation only ever borrows the frame, so nothing a query does can
/// alter or replace the session's data.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    frame: Frame,
}

impl Dataset {
    /// Creates a dataset, rejecting ragged columns and duplicate names.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> std::result::Result<Self, String> {
        Ok(Self {
            name: name.into(),
            frame: Frame::new(columns)?,
        })
    }

    pub(crate) fn from_frame(name: impl Into<String>, frame: Frame) -> Self {
        Self {
            name: name.into(),
            frame,
        }
    }

    /// Display name (file stem and sheet, or the sample name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying table.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// First `rows` rows, for the load preview.
    pub fn preview(&self, rows: usize) -> Frame {
        self.frame.head(rows)
    }

    /// Summarizes the columns and their inferred types.
    pub fn schema(&self) -> Schema {
        Schema::from_dataset(self)
    }
}
