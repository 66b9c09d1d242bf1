//! Dataset loading through the session.
//!
//! Files are written to a temp directory, loaded, and queried.

use askframe::app::{Session, SessionState};
use askframe::dataset::{self, ColumnType, Value};
use askframe::error::LoadError;
use askframe::llm::MockLlmClient;
use askframe::output::{Block, NoticeLevel};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const LOANS_CSV: &str = "\
Loan ID,Customer Name,Loan Amount (INR),Disbursement Date
GL001,Rahul Sharma,100000,2024-01-15
GL002,Priya Singh,250000,2024-02-03
GL003,Amit Patel,400000,2024-02-20
";

fn new_session(client: MockLlmClient) -> Session {
    Session::new(Box::new(client), Duration::from_secs(5))
}

#[test]
fn test_load_csv_and_infer_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loans.csv");
    fs::write(&path, LOANS_CSV).unwrap();

    let dataset = dataset::load(&path, None).unwrap();
    assert_eq!(dataset.name(), "loans");

    let types: Vec<ColumnType> = dataset.schema().columns.iter().map(|c| c.column_type).collect();
    assert_eq!(
        types,
        vec![
            ColumnType::Text,
            ColumnType::Text,
            ColumnType::Numeric,
            ColumnType::Temporal
        ]
    );
}

#[test]
fn test_load_tsv() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loans.tsv");
    fs::write(&path, LOANS_CSV.replace(',', "\t")).unwrap();

    let dataset = dataset::load(&path, None).unwrap();
    assert_eq!(dataset.frame().row_count(), 3);
    assert_eq!(
        dataset.frame().column("Loan Amount (INR)").unwrap().values[2],
        Value::Int(400000)
    );
}

#[test]
fn test_missing_and_malformed_are_distinct() {
    let dir = TempDir::new().unwrap();

    let missing = dataset::load(&dir.path().join("GoldLoan.xlsx"), None).unwrap_err();
    assert!(matches!(missing, LoadError::NotFound(_)));

    let fake = dir.path().join("GoldLoan.xlsx");
    fs::write(&fake, "definitely not a workbook").unwrap();
    let malformed = dataset::load(&fake, None).unwrap_err();
    assert!(matches!(malformed, LoadError::Malformed { .. }));
}

#[test]
fn test_session_load_shows_preview() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loans.csv");
    fs::write(&path, LOANS_CSV).unwrap();

    let mut session = new_session(MockLlmClient::new()).with_preview_rows(2);
    let output = session.load(&path, None);

    assert_eq!(
        output.blocks[0],
        Block::Notice(
            NoticeLevel::Success,
            "Dataset 'loans' loaded successfully!".to_string()
        )
    );
    match &output.blocks[2] {
        Block::Table(frame) => assert_eq!(frame.row_count(), 2),
        other => panic!("expected preview table, got {other:?}"),
    }
    assert_eq!(session.state(), SessionState::DatasetReady);
}

#[tokio::test]
async fn test_failed_load_blocks_questions() {
    let dir = TempDir::new().unwrap();
    let mut session = new_session(MockLlmClient::new());

    let output = session.load(&dir.path().join("GoldLoan.xlsx"), None);
    assert!(output.to_plain_text().contains("was not found"));
    assert_eq!(session.state(), SessionState::NoDatasetLoaded);

    let output = session
        .ask("What is the average loan amount?", CancellationToken::new())
        .await;
    assert_eq!(output.level(), Some(NoticeLevel::Error));
    assert_eq!(session.state(), SessionState::NoDatasetLoaded);
}

#[tokio::test]
async fn test_question_over_loaded_csv() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loans.csv");
    fs::write(&path, LOANS_CSV).unwrap();

    let client = MockLlmClient::new().with_expression(
        "february",
        "df[df['Disbursement Date'].dt.month == 2]['Customer Name'].tolist()",
    );
    let mut session = new_session(client);
    session.load(&path, None);

    let output = session
        .ask("Who borrowed in February?", CancellationToken::new())
        .await;
    assert!(output
        .to_plain_text()
        .contains("The result is: ['Priya Singh', 'Amit Patel']"));
}
