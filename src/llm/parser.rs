//! Response parsing for LLM outputs.
//!
//! Turns the model's structured payload into a query expression.

use serde::Deserialize;

use crate::error::{ArtifactError, Result};

/// The structured object the model is asked to return.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryArtifact {
    /// A single query expression over `df`.
    pub expression: String,
}

/// Parses the model's payload into an expression.
///
/// Structured output normally arrives as bare JSON, but a fenced
/// ```` ```json ```` block is tolerated. Returns `Ok(None)` when the artifact
/// is well-formed but its expression is blank.
pub fn parse_artifact(payload: &str) -> Result<Option<String>> {
    let body = extract_code_block(payload).unwrap_or(payload).trim();

    let payload_error = |reason: String| {
        let preview: String = body.chars().take(80).collect();
        ArtifactError::Payload(format!("{reason} (received: {preview})"))
    };

    // Derived struct deserialization also accepts a JSON array.
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| payload_error(e.to_string()))?;
    if !value.is_object() {
        return Err(payload_error("expected a JSON object".to_string()).into());
    }
    let artifact: QueryArtifact =
        serde_json::from_value(value).map_err(|e| payload_error(e.to_string()))?;

    let expression = artifact.expression.trim();
    if expression.is_empty() {
        Ok(None)
    } else {
        Ok(Some(expression.to_string()))
    }
}

/// Returns the contents of the first fenced code block, if any.
fn extract_code_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let content_start = after_fence.find('\n')? + 1;

    // Only a language tag may follow the opening fence.
    let tag = after_fence[..content_start].trim();
    if !tag.is_empty() && !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    let content = &after_fence[content_start..];
    let end = content.find("```")?;
    Some(&content[..end])
}
