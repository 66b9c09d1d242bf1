//! Column-oriented tables.
//!
//! A [`Frame`] is an ordered collection of equal-length named columns. The
//! loaded dataset and every tabular query result are frames.

use super::types::{ColumnType, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named, homogeneous sequence of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Values, one per row.
    pub values: Vec<Value>,
}

impl Column {
    /// Creates a new column.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of values in the column.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Infers the elementary type of the column from its non-null values.
    ///
    /// Mixed types and all-null columns fall back to text.
    pub fn column_type(&self) -> ColumnType {
        let mut inferred: Option<ColumnType> = None;
        for value in &self.values {
            let Some(ty) = value.column_type() else {
                continue;
            };
            match inferred {
                None => inferred = Some(ty),
                Some(existing) if existing == ty => {}
                Some(_) => return ColumnType::Text,
            }
        }
        inferred.unwrap_or(ColumnType::Text)
    }
}

/// An ordered collection of equal-length named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<Column>,
    rows: usize,
}

impl Frame {
    /// Creates a frame, validating uniform column length and unique names.
    pub fn new(columns: Vec<Column>) -> std::result::Result<Self, String> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::new();
        for column in &columns {
            if column.len() != rows {
                return Err(format!(
                    "column '{}' has {} values, expected {}",
                    column.name,
                    column.len(),
                    rows
                ));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(format!("duplicate column name '{}'", column.name));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Creates a frame from columns already known to be uniform and unique.
    pub(crate) fn from_trusted(columns: Vec<Column>) -> Self {
        debug_assert!(Self::new(columns.clone()).is_ok());
        let rows = columns.first().map(Column::len).unwrap_or(0);
        Self { columns, rows }
    }

    /// Creates a frame with an explicit row count and no columns.
    pub fn empty_with_rows(rows: usize) -> Self {
        Self {
            columns: Vec::new(),
            rows,
        }
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Looks up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Returns the values of one row, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        (index < self.rows).then(|| self.columns.iter().map(|c| &c.values[index]).collect())
    }

    /// Builds a new frame from the given row indices (in the given order).
    pub fn take_rows(&self, indices: &[usize]) -> Frame {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                Column::new(
                    c.name.clone(),
                    indices.iter().map(|&i| c.values[i].clone()).collect(),
                )
            })
            .collect();
        Frame {
            columns,
            rows: indices.len(),
        }
    }

    /// Returns the first `n` rows.
    pub fn head(&self, n: usize) -> Frame {
        let indices: Vec<usize> = (0..self.rows.min(n)).collect();
        self.take_rows(&indices)
    }

    /// Returns the last `n` rows.
    pub fn tail(&self, n: usize) -> Frame {
        let start = self.rows.saturating_sub(n);
        let indices: Vec<usize> = (start..self.rows).collect();
        self.take_rows(&indices)
    }
}
