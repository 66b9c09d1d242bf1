//! Built-in gold-loan sample dataset, used by `--sample` and in tests.

use super::{Column, Dataset, Frame, Value};
use chrono::NaiveDate;

/// Name shown for the sample dataset.
pub const SAMPLE_NAME: &str = "gold_loans (sample)";

type Row = (&'static str, &'static str, i64, f64, &'static str, f64, i64, (i32, u32, u32), &'static str);

const ROWS: &[Row] = &[
    ("GL001", "Rahul Sharma", 100000, 25.0, "22K", 9.5, 12, (2024, 1, 15), "Active"),
    ("GL002", "Priya Singh", 250000, 60.0, "24K", 10.5, 24, (2024, 2, 3), "Active"),
    ("GL003", "Amit Patel", 400000, 95.5, "22K", 11.0, 36, (2024, 2, 20), "Closed"),
    ("GL004", "Rahul Sharma", 150000, 38.0, "24K", 8.75, 12, (2024, 3, 11), "Active"),
    ("GL005", "Harpreet Singh", 75000, 18.5, "18K", 12.0, 6, (2024, 4, 2), "Overdue"),
    ("GL006", "Sneha Reddy", 320000, 80.0, "24K", 9.0, 24, (2024, 4, 28), "Active"),
    ("GL007", "Vikram Iyer", 50000, 12.0, "18K", 13.5, 6, (2024, 5, 9), "Closed"),
    ("GL008", "Anjali Gupta", 210000, 52.0, "22K", 10.0, 12, (2024, 6, 17), "Active"),
];

/// Returns the sample gold-loan table.
pub fn gold_loans() -> Dataset {
    let date = |(y, m, d): (i32, u32, u32)| {
        NaiveDate::from_ymd_opt(y, m, d).map_or(Value::Null, Value::Date)
    };

    let columns = vec![
        Column::new("Loan ID", ROWS.iter().map(|r| Value::from(r.0)).collect()),
        Column::new("Customer Name", ROWS.iter().map(|r| Value::from(r.1)).collect()),
        Column::new("Loan Amount (INR)", ROWS.iter().map(|r| Value::Int(r.2)).collect()),
        Column::new("Gold Weight (Grams)", ROWS.iter().map(|r| Value::Float(r.3)).collect()),
        Column::new("Gold Purity (Karat)", ROWS.iter().map(|r| Value::from(r.4)).collect()),
        Column::new("Interest Rate (p.a.)", ROWS.iter().map(|r| Value::Float(r.5)).collect()),
        Column::new("Loan Tenure (Months)", ROWS.iter().map(|r| Value::Int(r.6)).collect()),
        Column::new("Disbursement Date", ROWS.iter().map(|r| date(r.7)).collect()),
        Column::new("Loan Status", ROWS.iter().map(|r| Value::from(r.8)).collect()),
    ];

    Dataset::from_frame(SAMPLE_NAME, Frame::from_trusted(columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColumnType;

    #[test]
    fn test_sample_shape_and_types() {
        let dataset = gold_loans();
        let frame = dataset.frame();
        assert_eq!(frame.row_count(), ROWS.len());
        assert_eq!(frame.column_count(), 9);
        assert_eq!(
            frame.column("Disbursement Date").unwrap().column_type(),
            ColumnType::Temporal
        );
        assert_eq!(
            frame.column("Interest Rate (p.a.)").unwrap().column_type(),
            ColumnType::Numeric
        );
    }
}
