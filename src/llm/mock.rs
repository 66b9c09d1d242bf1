//! Mock LLM client for offline use and testing.
//!
//! Provides deterministic structured responses based on question patterns.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use crate::error::{AskError, Result};
use crate::llm::types::{Message, ResponseSchema, Role};
use crate::llm::LlmClient;

/// Built-in question patterns (all keywords must appear) and the expression
/// returned for them.
const DEFAULT_PATTERNS: &[(&[&str], &str)] = &[
    (&["average", "loan amount"], "df['Loan Amount (INR)'].mean()"),
    (&["mean", "loan amount"], "df['Loan Amount (INR)'].mean()"),
    (&["rahul sharma"], "df[df['Customer Name'] == 'Rahul Sharma']"),
    (&["interest", "below 10"], "df[df['Interest Rate (p.a.)'] < 10]"),
    (&["total", "gold weight"], "df['Gold Weight (Grams)'].sum()"),
    (&["how many", "12 months"], "df[df['Loan Tenure (Months)'] == 12].shape[0]"),
    (&["largest", "loan"], "df['Loan Amount (INR)'].max()"),
    (&["highest", "loan"], "df['Loan Amount (INR)'].max()"),
    (
        &["24k"],
        "df[df['Gold Purity (Karat)'] == '24K'][['Loan ID', 'Customer Name']]",
    ),
    (
        &["singh"],
        "df[df['Customer Name'].str.contains('Singh', case=False, na=False)]",
    ),
    (&["how many", "loans"], "df.shape[0]"),
    (&["first", "rows"], "df.head()"),
];

/// Mock LLM client that returns canned artifacts based on input patterns.
///
/// Unrecognised questions get the `None` expression, the same answer a real
/// model gives for questions the schema cannot answer.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> raw payload).
    custom_responses: Vec<(String, String)>,
    /// Error returned for every request, if set.
    failure: Option<String>,
    /// Artificial latency before responding.
    delay: Option<Duration>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose every request fails with a transport error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Adds a custom raw payload.
    ///
    /// When the question contains `pattern`, the mock returns `payload`
    /// verbatim, which lets tests feed malformed artifacts.
    pub fn with_response(mut self, pattern: impl Into<String>, payload: impl Into<String>) -> Self {
        self.custom_responses.push((pattern.into(), payload.into()));
        self
    }

    /// Adds a custom expression, wrapped in a well-formed artifact.
    pub fn with_expression(self, pattern: impl Into<String>, expression: &str) -> Self {
        let payload = json!({ "expression": expression }).to_string();
        self.with_response(pattern, payload)
    }

    /// Delays every response, for timeout and cancellation tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Generates a mock payload based on the question.
    fn mock_response(&self, input: &str) -> String {
        let input_lower = input.to_lowercase();

        // Check custom responses first
        for (pattern, response) in &self.custom_responses {
            if input_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        let expression = DEFAULT_PATTERNS
            .iter()
            .find(|(keywords, _)| keywords.iter().all(|k| input_lower.contains(k)))
            .map(|(_, expression)| *expression)
            .unwrap_or("None");

        json!({ "expression": expression }).to_string()
    }

    /// Extracts the last user message content from a message list.
    fn extract_user_input(messages: &[Message]) -> &str {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete_structured(
        &self,
        messages: &[Message],
        _schema: &ResponseSchema,
    ) -> Result<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(AskError::transport(message.clone()));
        }
        Ok(self.mock_response(Self::extract_user_input(messages)))
    }
}
