//! Schema summarization for askframe.
//!
//! Derives a compact, deterministic description of the dataset's columns and
//! their inferred types, used to ground the query-generation request.

use super::{ColumnType, Dataset};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Column name and inferred type label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Column name.
    pub name: String,

    /// Inferred elementary type.
    pub column_type: ColumnType,
}

/// Ephemeral mapping from column name to inferred type, in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// One entry per column.
    pub columns: Vec<ColumnSummary>,

    /// Number of rows in the dataset.
    pub row_count: usize,
}

impl Schema {
    /// Summarizes the given dataset.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let frame = dataset.frame();
        Self {
            columns: frame
                .columns()
                .iter()
                .map(|c| ColumnSummary {
                    name: c.name.clone(),
                    column_type: c.column_type(),
                })
                .collect(),
            row_count: frame.row_count(),
        }
    }

    /// Formats the schema for inclusion in an LLM prompt.
    ///
    /// One line per column, quoted so names with spaces or punctuation are
    /// unambiguous.
    pub fn format_for_llm(&self) -> String {
        let lines = self
            .columns
            .iter()
            .map(|c| format!("  - '{}': {}\n", c.name, c.column_type))
            .collect::<Vec<_>>()
            .join("");

        format!("Columns ({} rows):\n{}", self.row_count, lines)
    }

    /// Computes a hash of the schema content for cache invalidation.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.columns.len().hash(&mut hasher);
        for column in &self.columns {
            column.hash(&mut hasher);
        }
        self.row_count.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample::gold_loans;

    #[test]
    fn test_format_lists_columns_in_order() {
        let schema = Schema::from_dataset(&gold_loans());
        let text = schema.format_for_llm();

        let loan_id = text.find("'Loan ID': text").unwrap();
        let customer = text.find("'Customer Name': text").unwrap();
        let amount = text.find("'Loan Amount (INR)': numeric").unwrap();
        assert!(loan_id < customer);
        assert!(customer < amount);
    }

    #[test]
    fn test_every_column_listed_once() {
        let dataset = gold_loans();
        let text = Schema::from_dataset(&dataset).format_for_llm();
        for name in dataset.frame().column_names() {
            assert_eq!(text.matches(&format!("'{name}'")).count(), 1, "{name}");
        }
    }

    #[test]
    fn test_summary_is_deterministic() {
        let dataset = gold_loans();
        let a = Schema::from_dataset(&dataset);
        let b = Schema::from_dataset(&dataset);
        assert_eq!(a.format_for_llm(), b.format_for_llm());
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_hash_changes_with_columns() {
        let mut schema = Schema::from_dataset(&gold_loans());
        let before = schema.content_hash();
        schema.columns.pop();
        assert_ne!(before, schema.content_hash());
    }
}
