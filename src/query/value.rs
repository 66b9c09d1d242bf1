//! Values produced by query evaluation.

use crate::dataset::{Column, Frame, Value};

/// A one-dimensional labelled sequence, e.g. a selected column.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Series name (the source column, or the aggregate's name).
    pub name: String,
    /// Values, one per row.
    pub values: Vec<Value>,
    /// Row labels, when they carry meaning (group keys, `value_counts`).
    pub index: Option<Column>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
            index: None,
        }
    }

    pub fn with_index(mut self, index: Column) -> Self {
        self.index = Some(index);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Same series with new values, keeping name and labels.
    pub fn map_values(&self, values: Vec<Value>) -> Self {
        Self {
            name: self.name.clone(),
            values,
            index: self.index.clone(),
        }
    }

    /// Picks positions, carrying labels along.
    pub fn take(&self, indices: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            values: indices.iter().map(|&i| self.values[i].clone()).collect(),
            index: self.index.as_ref().map(|index| {
                Column::new(
                    index.name.clone(),
                    indices.iter().map(|&i| index.values[i].clone()).collect(),
                )
            }),
        }
    }

    /// Renders as a table: the label column (if any) then the values.
    pub fn to_frame(&self) -> Frame {
        let mut columns = Vec::with_capacity(2);
        let mut value_name = self.name.clone();
        if let Some(index) = &self.index {
            if index.name == value_name {
                value_name = format!("{value_name} (value)");
            }
            columns.push(index.clone());
        }
        columns.push(Column::new(value_name, self.values.clone()));
        // Both columns share the series length and have distinct names.
        Frame::new(columns).unwrap_or_else(|_| Frame::empty_with_rows(self.len()))
    }
}

/// Result of evaluating a query expression.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Rows and columns.
    Table(Frame),
    /// One labelled column.
    Series(Series),
    /// Single value (number, text, boolean, date).
    Scalar(Value),
    /// Unlabelled list, e.g. from `unique()` or `columns`.
    List(Vec<Value>),
    /// Explicitly no result.
    None,
}

impl QueryValue {
    /// Renders non-tabular results the way an interactive interpreter would.
    pub fn to_display_string(&self) -> String {
        match self {
            QueryValue::Table(frame) => format!("<table: {} rows>", frame.row_count()),
            QueryValue::Series(series) => format!("<series '{}': {} rows>", series.name, series.len()),
            QueryValue::Scalar(value) => value.to_display_string(),
            QueryValue::List(values) => format_list(values, "[", "]"),
            QueryValue::None => "None".to_string(),
        }
    }
}

/// Python-style list rendering: text quoted, everything else bare.
pub fn format_list(values: &[Value], open: &str, close: &str) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| match v {
            Value::Text(s) => format!("'{s}'"),
            Value::Date(_) | Value::DateTime(_) => format!("'{}'", v.to_display_string()),
            other => other.to_display_string(),
        })
        .collect();
    format!("{open}{}{close}", items.join(", "))
}
