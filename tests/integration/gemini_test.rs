//! Gemini transport against a local mock server.
//!
//! Checks that transport failures and malformed responses surface as
//! different notices, and that the session survives both.

use askframe::app::{Session, SessionState};
use askframe::dataset::gold_loans;
use askframe::error::{ArtifactError, AskError};
use askframe::llm::{GeminiClient, GeminiConfig, LlmClient, Message, ResponseSchema};
use askframe::output::{Block, NoticeLevel};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const MODEL: &str = "test-model";
const GENERATE_PATH: &str = "/models/test-model:generateContent";

fn client_for(server: &MockServer) -> GeminiClient {
    let config = GeminiConfig::new("test-key", MODEL)
        .with_endpoint(server.base_url())
        .with_timeout(5);
    GeminiClient::new(config).unwrap()
}

fn session_for(server: &MockServer) -> Session {
    let mut session = Session::new(Box::new(client_for(server)), Duration::from_secs(5));
    session.set_dataset(gold_loans());
    session
}

/// A success envelope whose first part carries `text`.
fn envelope(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_structured_request_and_answer() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GENERATE_PATH)
                .header("x-goog-api-key", "test-key");
            then.status(200).json_body(envelope(
                r#"{"expression": "df['Loan Amount (INR)'].max()"}"#,
            ));
        })
        .await;

    let mut session = session_for(&server);
    let output = session
        .ask("What is the largest loan?", CancellationToken::new())
        .await;

    mock.assert_async().await;
    assert_eq!(
        output.blocks[1],
        Block::Notice(NoticeLevel::Success, "The result is: 400000".to_string())
    );
}

#[tokio::test]
async fn test_raw_client_returns_inner_text() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(envelope(r#"{"expression": "df.head()"}"#));
        })
        .await;

    let client = client_for(&server);
    let payload = client
        .complete_structured(
            &[Message::user("first rows")],
            &ResponseSchema::QUERY_ARTIFACT,
        )
        .await
        .unwrap();
    assert_eq!(payload, r#"{"expression": "df.head()"}"#);
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(500)
                .json_body(json!({ "error": { "code": 500, "message": "Internal error" } }));
        })
        .await;

    let client = client_for(&server);
    let err = client
        .complete_structured(&[Message::user("q")], &ResponseSchema::QUERY_ARTIFACT)
        .await
        .unwrap_err();
    assert!(matches!(err, AskError::Transport(_)), "{err:?}");

    let mut session = session_for(&server);
    let output = session
        .ask("What is the largest loan?", CancellationToken::new())
        .await;
    let text = output.to_plain_text();
    assert!(text.contains("Error communicating with the Gemini API"), "{text}");
    assert!(text.contains("Internal error"), "{text}");
    assert_eq!(session.state(), SessionState::DatasetReady);
}

#[tokio::test]
async fn test_non_json_inner_text_is_artifact_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200)
                .json_body(envelope("Sure! The answer is the mean of the column."));
        })
        .await;

    let mut session = session_for(&server);
    let output = session
        .ask("What is the largest loan?", CancellationToken::new())
        .await;
    let text = output.to_plain_text();
    assert_eq!(output.level(), Some(NoticeLevel::Error));
    assert!(text.contains("malformed JSON"), "{text}");
    assert!(!text.contains("communicating with the Gemini API"), "{text}");
    assert!(session.dataset().is_some());
}

#[tokio::test]
async fn test_missing_candidates_is_envelope_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(json!({ "candidates": [] }));
        })
        .await;

    let err = client_for(&server)
        .complete_structured(&[Message::user("q")], &ResponseSchema::QUERY_ARTIFACT)
        .await
        .unwrap_err();
    assert!(
        matches!(err, AskError::Artifact(ArtifactError::Envelope(_))),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_unauthorized_mentions_api_key() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(403)
                .json_body(json!({ "error": { "message": "API key not valid" } }));
        })
        .await;

    let err = client_for(&server)
        .complete_structured(&[Message::user("q")], &ResponseSchema::QUERY_ARTIFACT)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("GEMINI_API_KEY"), "{err}");
}

#[tokio::test]
async fn test_blank_expression_is_warning() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(envelope(r#"{"expression": "   "}"#));
        })
        .await;

    let mut session = session_for(&server);
    let output = session
        .ask("What's the weather?", CancellationToken::new())
        .await;
    assert_eq!(output.level(), Some(NoticeLevel::Warning));
}
