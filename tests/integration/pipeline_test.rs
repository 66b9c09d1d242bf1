//! End-to-end pipeline tests over the sample dataset.
//!
//! Question → mock model → evaluator → output, through the public `Session`.

use askframe::app::{Session, SessionState};
use askframe::dataset::{gold_loans, Column, Dataset, Value};
use askframe::llm::MockLlmClient;
use askframe::output::{Block, NoticeLevel, Output, NO_DATA_MATCHED};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn session_with(client: MockLlmClient, dataset: Dataset) -> Session {
    let mut session = Session::new(Box::new(client), Duration::from_secs(5));
    session.set_dataset(dataset);
    session
}

fn sample_session(client: MockLlmClient) -> Session {
    session_with(client, gold_loans())
}

async fn ask(session: &mut Session, question: &str) -> Output {
    session.ask(question, CancellationToken::new()).await
}

#[test]
fn test_schema_lists_every_column_once_in_order() {
    let dataset = gold_loans();
    let schema = dataset.schema();
    let names: Vec<&str> = schema.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, dataset.frame().column_names());

    let prompt = schema.format_for_llm();
    for name in names {
        assert_eq!(prompt.matches(&format!("'{name}'")).count(), 1, "{name}");
    }
}

#[tokio::test]
async fn test_mean_is_labeled_answer() {
    let dataset = Dataset::new(
        "three_loans",
        vec![Column::new(
            "Loan Amount (INR)",
            vec![Value::Int(100000), Value::Int(250000), Value::Int(400000)],
        )],
    )
    .unwrap();
    let mut session = session_with(MockLlmClient::new(), dataset);

    let output = ask(&mut session, "What is the average loan amount?").await;
    assert_eq!(
        output.blocks,
        vec![
            Block::Heading("Here is your answer:".to_string()),
            Block::Notice(NoticeLevel::Success, "The result is: 250000.0".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_filter_by_name_returns_table() {
    let mut session = sample_session(MockLlmClient::new());
    let output = ask(&mut session, "Show loans for Rahul Sharma").await;

    assert_eq!(output.blocks[0], Block::Heading("Here is your extracted data:".to_string()));
    match &output.blocks[1] {
        Block::Table(frame) => {
            assert_eq!(frame.row_count(), 2);
            assert_eq!(frame.column_count(), 9);
        }
        other => panic!("expected table, got {other:?}"),
    }
    assert_eq!(
        output.blocks[2],
        Block::Notice(NoticeLevel::Success, "2 rows matched your query.".to_string())
    );
}

#[tokio::test]
async fn test_no_match_is_info_notice() {
    let client = MockLlmClient::new()
        .with_expression("nobody", "df[df['Customer Name'] == 'Nobody']");
    let mut session = sample_session(client);

    let output = ask(&mut session, "Loans for Nobody").await;
    assert_eq!(output, Output::info(NO_DATA_MATCHED));
}

#[tokio::test]
async fn test_forbidden_names_echo_expression_and_leave_data_unchanged() {
    for expression in ["os.system('ls')", "__import__('os')", "df.__class__", "exec('x = 1')"] {
        let client = MockLlmClient::new().with_expression("sneaky", expression);
        let mut session = sample_session(client);
        let before = session.dataset().unwrap().clone();

        let output = ask(&mut session, "sneaky question").await;
        assert_eq!(output.level(), Some(NoticeLevel::Error), "{expression}");
        assert_eq!(
            output.blocks.last(),
            Some(&Block::Code(format!(
                "Generated code (for debugging): {expression}"
            )))
        );
        assert_eq!(session.dataset(), Some(&before));
        assert_eq!(session.state(), SessionState::DatasetReady);
    }
}

#[tokio::test]
async fn test_transport_failure_then_recovery() {
    let mut session = sample_session(MockLlmClient::failing("Gemini API error (500): boom"));
    let output = ask(&mut session, "What is the average loan amount?").await;
    assert!(output
        .to_plain_text()
        .starts_with("[error] Error communicating with the Gemini API"));
    assert_eq!(session.state(), SessionState::DatasetReady);
    assert!(session.dataset().is_some());
}

#[tokio::test]
async fn test_malformed_payload_is_artifact_error() {
    let client = MockLlmClient::new().with_response("weird", "this is not json");
    let mut session = sample_session(client);

    let output = ask(&mut session, "a weird question").await;
    let text = output.to_plain_text();
    assert!(text.contains("malformed JSON"), "{text}");
    assert!(!text.contains("communicating with the Gemini API"));
}

#[tokio::test]
async fn test_repeated_questions_are_independent() {
    let mut session = sample_session(MockLlmClient::new());
    let first = ask(&mut session, "What is the total gold weight?").await;
    let second = ask(&mut session, "What is the total gold weight?").await;
    assert_eq!(first, second);
    assert!(first.to_plain_text().contains("The result is: 381.0"));
}

#[tokio::test]
async fn test_projection_and_count_questions() {
    let mut session = sample_session(MockLlmClient::new());

    let output = ask(&mut session, "How many loans are there?").await;
    assert!(output.to_plain_text().contains("The result is: 8"));

    let output = ask(&mut session, "Show 24K purity loans").await;
    match &output.blocks[1] {
        Block::Table(frame) => {
            assert_eq!(frame.column_names(), vec!["Loan ID", "Customer Name"]);
            assert_eq!(frame.row_count(), 3);
        }
        other => panic!("expected table, got {other:?}"),
    }
}

#[tokio::test]
async fn test_blank_question_never_reaches_model() {
    let mut session = sample_session(MockLlmClient::failing("should not be called"));
    let output = ask(&mut session, "  \t ").await;
    assert_eq!(output, Output::warning("Please enter a question to get an answer."));
}

#[tokio::test]
async fn test_cancel_mid_flight() {
    let mut session = sample_session(MockLlmClient::new().with_delay(Duration::from_secs(10)));
    let token = CancellationToken::new();
    let trigger = token.clone();

    let (output, _) = tokio::join!(session.ask("average loan amount", token), async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    assert_eq!(output, Output::warning("Request cancelled."));
    assert_eq!(session.state(), SessionState::DatasetReady);
}
