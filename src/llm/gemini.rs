//! Gemini LLM client implementation.
//!
//! Implements the LlmClient trait for the Gemini `generateContent` API with
//! JSON-constrained output.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ArtifactError, AskError, Result};
use crate::llm::types::{Message, ResponseSchema, Role};
use crate::llm::LlmClient;

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default Gemini API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini client configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Model to use (e.g., "gemini-2.0-flash").
    pub model: String,
    /// API base URL, without the `/models/...` suffix.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeminiConfig {
    /// Creates a new config with the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the API base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Full URL of the `generateContent` call for the configured model.
    pub fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

/// Gemini LLM client.
///
/// Holds no idle connections: every request opens and closes its own.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    /// Creates a new Gemini client with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| AskError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the request body: system text as `systemInstruction`, the
    /// remaining messages as `contents` turns.
    fn build_request(messages: &[Message], schema: &ResponseSchema) -> GeminiRequest {
        let system_text = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let contents = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| GeminiContent {
                role: Some(m.role.as_str().to_string()),
                parts: vec![GeminiPart {
                    text: Some(m.content.clone()),
                }],
            })
            .collect();

        GeminiRequest {
            system_instruction: (!system_text.is_empty()).then(|| GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(system_text),
                }],
            }),
            contents,
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema.to_json(),
            },
        }
    }

    /// Maps a non-2xx response to a transport error.
    fn parse_error(status: reqwest::StatusCode, body: &str) -> AskError {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return AskError::transport(format!(
                "Authentication failed ({status}). Check your GEMINI_API_KEY."
            ));
        }

        if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(body) {
            return AskError::transport(format!(
                "Gemini API error ({}): {}",
                status, error_response.error.message
            ));
        }

        AskError::transport(format!("Gemini API error ({}): {}", status, body.trim()))
    }

    /// Extracts `candidates[0].content.parts[0].text` from a success body.
    fn extract_text(body: &str) -> Result<String> {
        let response: GeminiResponse = serde_json::from_str(body)
            .map_err(|e| ArtifactError::Envelope(format!("response body is not valid JSON: {e}")))?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ArtifactError::Envelope("no candidates in response".to_string()))?;

        let content = candidate.content.ok_or_else(|| {
            let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
            ArtifactError::Envelope(format!("candidate has no content (finish reason: {reason})"))
        })?;

        content
            .parts
            .into_iter()
            .next()
            .and_then(|p| p.text)
            .ok_or_else(|| ArtifactError::Envelope("candidate content has no text part".to_string()).into())
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete_structured(
        &self,
        messages: &[Message],
        schema: &ResponseSchema,
    ) -> Result<String> {
        let request = Self::build_request(messages, schema);
        debug!(
            model = %self.config.model,
            turns = request.contents.len(),
            "Gemini API request"
        );

        let response = self
            .client
            .post(self.config.request_url())
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AskError::Timeout(self.config.timeout_secs)
                } else if e.is_connect() {
                    AskError::transport("Failed to connect to the Gemini API. Check your network.")
                } else {
                    AskError::transport(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AskError::transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            warn!(%status, "Gemini API request failed");
            return Err(Self::parse_error(status, &body));
        }

        Self::extract_text(&body)
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: JsonValue,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}
