//! Reads a dataset from CSV/TSV or spreadsheet files.
//!
//! The first row names the columns. CSV cells are typed per value; workbook
//! cells keep the type the workbook stored.

use super::{Column, Dataset, Value};
use crate::error::LoadError;
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{Days, NaiveDate, NaiveTime};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Loads the dataset at `path`.
///
/// `sheet` selects a worksheet in workbook files and is ignored for CSV.
/// When absent the first worksheet is used.
pub fn load(path: &Path, sheet: Option<&str>) -> Result<Dataset, LoadError> {
    let path_text = path.display().to_string();
    if !path.exists() {
        return Err(LoadError::NotFound(path_text));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let malformed = |reason: String| LoadError::Malformed {
        path: path_text.clone(),
        reason,
    };

    let (name, grid) = match extension.as_str() {
        "csv" | "txt" => (file_stem(path), read_delimited(path, None).map_err(malformed)?),
        "tsv" | "tab" => (file_stem(path), read_delimited(path, Some(b'\t')).map_err(malformed)?),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
            let (sheet_name, grid) = read_workbook(path, sheet).map_err(malformed)?;
            (format!("{} [{}]", file_stem(path), sheet_name), grid)
        }
        other => {
            return Err(malformed(format!("unsupported file type '.{other}'")));
        }
    };

    let dataset = build_dataset(name, grid).map_err(malformed)?;
    info!(
        path = %path_text,
        rows = dataset.frame().row_count(),
        columns = dataset.frame().column_count(),
        "Dataset loaded"
    );
    Ok(dataset)
}

/// A header row plus typed body rows, before column assembly.
struct Grid {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_delimited(path: &Path, delimiter: Option<u8>) -> Result<Grid, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&content));
    debug!(delimiter = %(delimiter as char).escape_default(), "Reading delimited file");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let headers = match records.next() {
        Some(record) => record
            .map_err(|e| e.to_string())?
            .iter()
            .map(|h| h.trim().to_string())
            .collect(),
        None => return Err("no columns to parse from file".to_string()),
    };

    let rows = records
        .map(|record| {
            record
                .map(|r| r.iter().map(Value::parse_cell).collect())
                .map_err(|e| e.to_string())
        })
        .collect::<Result<Vec<Vec<Value>>, String>>()?;

    Ok(Grid { headers, rows })
}

/// Picks the delimiter that yields the most consistent field count (>1) over
/// the first lines. Defaults to comma.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let target = counts.first().copied().unwrap_or(0);
        if target <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<(String, Grid), String> {
    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| format!("failed to open workbook: {e}"))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(requested) if sheet_names.iter().any(|s| s == requested) => requested.to_string(),
        Some(requested) => return Err(format!("worksheet named '{requested}' not found")),
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| "workbook contains no sheets".to_string())?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("failed to read sheet '{sheet_name}': {e}"))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Err(format!("sheet '{sheet_name}' is empty")),
    };
    let rows = rows.map(|row| row.iter().map(workbook_cell).collect()).collect();

    debug!(sheet = %sheet_name, "Read worksheet");
    Ok((sheet_name, Grid { headers, rows }))
}

fn workbook_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::Text(s.clone()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Value::Int(*f as i64),
        Data::Float(f) => Value::Float(*f),
        Data::Int(i) => Value::Int(*i),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => excel_serial_to_value(dt.as_f64()),
        Data::DateTimeIso(s) => Value::parse_temporal(s).unwrap_or_else(|| Value::Text(s.clone())),
        Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

/// Converts an Excel serial day number (1900 date system) to a date, or a
/// date-time when it carries a time-of-day fraction.
pub fn excel_serial_to_value(serial: f64) -> Value {
    if !serial.is_finite() || serial < 0.0 {
        return Value::Float(serial);
    }

    let mut days = serial.trunc() as u64;
    let mut seconds = (serial.fract() * SECONDS_PER_DAY).round() as u32;
    if seconds >= SECONDS_PER_DAY as u32 {
        days += 1;
        seconds = 0;
    }

    let Some(date) = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.checked_add_days(Days::new(days)))
    else {
        return Value::Float(serial);
    };

    if seconds == 0 {
        return Value::Date(date);
    }
    match NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0) {
        Some(time) => Value::DateTime(date.and_time(time)),
        None => Value::Date(date),
    }
}

/// Names blank headers `Unnamed: i` and suffixes repeats with `.1`, `.2`...
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(i, name)| {
            let base = if name.is_empty() {
                format!("Unnamed: {i}")
            } else {
                name
            };
            let mut candidate = base.clone();
            let mut suffix = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{base}.{suffix}");
                suffix += 1;
            }
            candidate
        })
        .collect()
}

fn build_dataset(name: String, grid: Grid) -> Result<Dataset, String> {
    let Grid { headers, rows } = grid;
    if headers.iter().all(|h| h.is_empty()) {
        return Err("no columns to parse from file".to_string());
    }
    let headers = normalize_headers(headers);
    let width = headers.len();

    let mut values: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); width];
    for (line, row) in rows.into_iter().enumerate() {
        if row.len() > width {
            // Header is line 1, so body row `line` sits at line + 2.
            return Err(format!(
                "expected {} fields in line {}, saw {}",
                width,
                line + 2,
                row.len()
            ));
        }
        if row.iter().all(Value::is_null) {
            continue;
        }
        let padded = row.into_iter().chain(std::iter::repeat(Value::Null));
        for (column, value) in values.iter_mut().zip(padded) {
            column.push(value);
        }
    }

    let columns = headers
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Dataset::new(name, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let err = load(Path::new("/definitely/not/here.xlsx"), None).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_load_csv_infers_types() {
        let file = csv_file(".csv", "Name,Amount,Date\nRahul,100000,2024-01-15\nPriya,2.5,\n");
        let dataset = load(file.path(), None).unwrap();
        let frame = dataset.frame();
        assert_eq!(frame.column_names(), vec!["Name", "Amount", "Date"]);
        assert_eq!(
            frame.column("Amount").unwrap().values,
            vec![Value::Int(100000), Value::Float(2.5)]
        );
        assert_eq!(frame.column("Date").unwrap().values[1], Value::Null);
    }

    #[test]
    fn test_load_sniffs_semicolon_delimiter() {
        let file = csv_file(".csv", "a;b\n1;2\n3;4\n");
        let dataset = load(file.path(), None).unwrap();
        assert_eq!(dataset.frame().column_names(), vec!["a", "b"]);
        assert_eq!(dataset.frame().row_count(), 2);
    }

    #[test]
    fn test_load_pads_short_rows_and_rejects_long_rows() {
        let file = csv_file(".csv", "a,b,c\n1,2\n");
        let dataset = load(file.path(), None).unwrap();
        assert_eq!(dataset.frame().column("c").unwrap().values, vec![Value::Null]);

        let file = csv_file(".csv", "a,b\n1,2,3\n");
        let err = load(file.path(), None).unwrap_err();
        match err {
            LoadError::Malformed { reason, .. } => assert!(reason.contains("line 2")),
            other => panic!("expected malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_load_empty_file_is_malformed() {
        let file = csv_file(".csv", "");
        assert!(matches!(
            load(file.path(), None),
            Err(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn test_load_unsupported_extension_is_malformed() {
        let file = csv_file(".json", "{}");
        match load(file.path(), None) {
            Err(LoadError::Malformed { reason, .. }) => assert!(reason.contains(".json")),
            other => panic!("expected malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_load_garbage_workbook_is_malformed() {
        let file = csv_file(".xlsx", "this is not a zip archive");
        assert!(matches!(
            load(file.path(), None),
            Err(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn test_normalize_headers() {
        let headers = normalize_headers(vec![
            "a".to_string(),
            "".to_string(),
            "a".to_string(),
            "a".to_string(),
        ]);
        assert_eq!(headers, vec!["a", "Unnamed: 1", "a.1", "a.2"]);
    }

    #[test]
    fn test_excel_serial_conversion() {
        assert_eq!(
            excel_serial_to_value(45306.0),
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        let noon = excel_serial_to_value(45306.5);
        assert_eq!(
            noon,
            Value::DateTime(
                NaiveDate::from_ymd_opt(2024, 1, 15)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap()
            )
        );
        assert_eq!(excel_serial_to_value(-1.0), Value::Float(-1.0));
    }

    #[test]
    fn test_sniff_delimiter_prefers_consistent_candidate() {
        assert_eq!(sniff_delimiter("a\tb\tc\n1\t2\t3\n"), b'\t');
        assert_eq!(sniff_delimiter("a,b\n1,2\n"), b',');
        assert_eq!(sniff_delimiter("single\n"), b',');
    }
}
