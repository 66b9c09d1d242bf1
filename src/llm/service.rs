//! Query synthesis: question + schema in, one expression out.
//!
//! Wraps the LLM client with prompt building and artifact parsing. One model
//! call per question, no retries, no conversation memory.

use std::time::Instant;

use crate::dataset::Schema;
use crate::error::{AskError, Result};

use super::{build_messages, parse_artifact, LlmClient, PromptCache, ResponseSchema};

/// Turns natural-language questions into query expressions.
pub struct QuerySynthesizer {
    client: Box<dyn LlmClient>,
    prompt_cache: PromptCache,
}

impl QuerySynthesizer {
    /// Creates a new synthesizer around the given client.
    pub fn new(client: Box<dyn LlmClient>) -> Self {
        Self {
            client,
            prompt_cache: PromptCache::new(),
        }
    }

    /// Asks the model for an expression answering `question`.
    ///
    /// Returns `Ok(None)` when the model answered with a blank expression.
    pub async fn synthesize(&mut self, question: &str, schema: &Schema) -> Result<Option<String>> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AskError::EmptyInput);
        }

        let start = Instant::now();
        tracing::debug!(question_len = question.len(), "Starting query synthesis");

        let messages = build_messages(&mut self.prompt_cache, schema, question);
        let payload = self
            .client
            .complete_structured(&messages, &ResponseSchema::QUERY_ARTIFACT)
            .await?;

        tracing::debug!(
            llm_duration_ms = start.elapsed().as_millis(),
            payload_len = payload.len(),
            "Received LLM response"
        );

        let expression = parse_artifact(&payload)?;
        tracing::info!(
            total_duration_ms = start.elapsed().as_millis(),
            has_expression = expression.is_some(),
            "Query synthesis complete"
        );
        Ok(expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::gold_loans;
    use crate::error::ArtifactError;
    use crate::llm::MockLlmClient;

    fn synthesizer(client: MockLlmClient) -> QuerySynthesizer {
        QuerySynthesizer::new(Box::new(client))
    }

    #[tokio::test]
    async fn test_synthesize_returns_expression() {
        let mut synth = synthesizer(MockLlmClient::new());
        let schema = gold_loans().schema();
        let expr = synth
            .synthesize("What is the total gold weight?", &schema)
            .await
            .unwrap();
        assert_eq!(expr, Some("df['Gold Weight (Grams)'].sum()".to_string()));
    }

    #[tokio::test]
    async fn test_synthesize_rejects_blank_question() {
        let mut synth = synthesizer(MockLlmClient::new());
        let err = synth
            .synthesize("   ", &gold_loans().schema())
            .await
            .unwrap_err();
        assert!(matches!(err, AskError::EmptyInput));
    }

    #[tokio::test]
    async fn test_synthesize_empty_expression_is_none() {
        let mut synth = synthesizer(MockLlmClient::new().with_expression("blank", ""));
        let expr = synth
            .synthesize("blank please", &gold_loans().schema())
            .await
            .unwrap();
        assert_eq!(expr, None);
    }

    #[tokio::test]
    async fn test_synthesize_propagates_payload_error() {
        let mut synth = synthesizer(MockLlmClient::new().with_response("x", "plain text"));
        let err = synth
            .synthesize("x marks the spot", &gold_loans().schema())
            .await
            .unwrap_err();
        assert!(matches!(err, AskError::Artifact(ArtifactError::Payload(_))));
    }
}
