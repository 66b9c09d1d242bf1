//! Message and response-schema types for LLM communication.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Role of a message in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions and dataset context.
    System,
    /// The user's question.
    User,
    /// A prior model turn (used for few-shot examples).
    Model,
}

impl Role {
    /// Returns the role as a string for API requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// A single message in a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender.
    pub role: Role,
    /// The content of the message.
    pub content: String,
}

impl Message {
    /// Creates a new message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a model message.
    pub fn model(content: impl Into<String>) -> Self {
        Self::new(Role::Model, content)
    }
}

/// Shape the model's structured output must follow: an object with a
/// single required string property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSchema {
    field: &'static str,
}

impl ResponseSchema {
    /// The query artifact shape, `{"expression": string}`.
    pub const QUERY_ARTIFACT: ResponseSchema = ResponseSchema {
        field: "expression",
    };

    /// Name of the required property.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Renders the schema in the OpenAPI subset the Gemini API accepts.
    pub fn to_json(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        properties.insert(self.field.to_string(), json!({ "type": "STRING" }));
        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": [self.field]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::system("x").role, Role::System);
        assert_eq!(Message::user("x").role, Role::User);
        assert_eq!(Message::model("x").role, Role::Model);
        assert_eq!(Role::Model.as_str(), "model");
    }

    #[test]
    fn test_response_schema_json() {
        let schema = ResponseSchema::QUERY_ARTIFACT.to_json();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["expression"]["type"], "STRING");
        assert_eq!(schema["required"], json!(["expression"]));
    }
}
