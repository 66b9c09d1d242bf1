//! LLM integration for askframe.
//!
//! Provides the client trait, the Gemini and mock implementations, and the
//! prompt/parse pipeline that turns a question into one query expression.

pub mod factory;
pub mod gemini;
pub mod mock;
pub mod parser;
pub mod prompt;
pub mod service;
pub mod types;

pub use factory::create_client;
pub use gemini::{GeminiClient, GeminiConfig};
pub use mock::MockLlmClient;
pub use parser::{parse_artifact, QueryArtifact};
pub use prompt::{build_messages, build_system_prompt, PromptCache};
pub use service::QuerySynthesizer;
pub use types::{Message, ResponseSchema, Role};

use async_trait::async_trait;
use std::str::FromStr;

use crate::error::Result;

/// Trait for LLM clients that return structured output.
///
/// Implementations must be thread-safe (Send + Sync) to support async operations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends the messages and returns the text of the structured response.
    ///
    /// The returned text is the model's raw payload, expected to be JSON
    /// matching `schema`. Checking that is the caller's job; implementations
    /// only fail for transport problems or a malformed response envelope.
    async fn complete_structured(
        &self,
        messages: &[Message],
        schema: &ResponseSchema,
    ) -> Result<String>;
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// Google Gemini.
    #[default]
    Gemini,
    /// Mock client for offline use and tests (no API key required)
    Mock,
}

impl LlmProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown LLM provider: {}", s)),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
