//! LLM client factory.
//!
//! Centralizes provider-specific logic for creating LLM clients.

use crate::config::LlmConfig;
use crate::error::{AskError, Result};
use crate::llm::{GeminiClient, GeminiConfig, LlmClient, LlmProvider, MockLlmClient};

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Creates an LLM client for the configured provider.
///
/// If `api_key` is provided, it takes precedence over `GEMINI_API_KEY`.
/// Gemini without a key is a configuration error, raised here so it surfaces
/// at startup rather than on the first question.
pub fn create_client(config: &LlmConfig, api_key: Option<String>) -> Result<Box<dyn LlmClient>> {
    match config.provider()? {
        LlmProvider::Gemini => {
            let key = api_key
                .or_else(|| std::env::var(API_KEY_ENV).ok())
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| {
                    AskError::config(format!(
                        "{API_KEY_ENV} is not set. Export it or add it to a .env file, or run with --llm mock."
                    ))
                })?;
            let gemini = GeminiConfig::new(key, config.model())
                .with_endpoint(config.endpoint.clone())
                .with_timeout(config.timeout_secs);
            Ok(Box::new(GeminiClient::new(gemini)?))
        }
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
    }
}
