//! Error types for askframe.
//!
//! Defines the main error enum used throughout the application. Every
//! variant maps to a distinct user-visible notice so "nothing matched" can
//! always be told apart from "something failed".

use thiserror::Error;

/// Main error type for askframe operations.
#[derive(Error, Debug)]
pub enum AskError {
    /// Dataset file missing or unreadable (blocks the query interface).
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Oracle unreachable, network/auth failure, or non-2xx status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Oracle responded, but the response or its inner payload was malformed.
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// The generated expression failed to parse or evaluate.
    #[error("Evaluation error: {message}")]
    Evaluation {
        /// What went wrong.
        message: String,
        /// The offending expression, kept for diagnostic display.
        expression: String,
    },

    /// A blank question was submitted.
    #[error("Please enter a question to get an answer.")]
    EmptyInput,

    /// The oracle call exceeded the configured time limit.
    #[error("The request timed out after {0}s")]
    Timeout(u64),

    /// The user cancelled the in-flight request.
    #[error("Request cancelled")]
    Cancelled,

    /// Configuration errors (invalid config file, missing credential, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (terminal setup, unexpected states, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a dataset could not be loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The file does not exist.
    #[error("file '{0}' was not found")]
    NotFound(String),

    /// The file exists but its contents could not be read as a table.
    #[error("could not read '{path}': {reason}")]
    Malformed {
        /// Path of the offending file.
        path: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Why an oracle response could not be turned into a query artifact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArtifactError {
    /// The response body lacked the expected candidate/content/parts structure.
    #[error("the model did not return a valid structured response: {0}")]
    Envelope(String),

    /// The structured field was not parseable as the expected artifact.
    #[error("failed to parse the model's JSON payload: {0}")]
    Payload(String),
}

impl AskError {
    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates an evaluation error that echoes the offending expression.
    pub fn evaluation(msg: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::Evaluation {
            message: msg.into(),
            expression: expression.into(),
        }
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Load(_) => "Load Error",
            Self::Transport(_) => "Transport Error",
            Self::Artifact(_) => "Artifact Error",
            Self::Evaluation { .. } => "Evaluation Error",
            Self::EmptyInput => "Empty Input",
            Self::Timeout(_) => "Timeout",
            Self::Cancelled => "Cancelled",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using AskError.
pub type Result<T> = std::result::Result<T, AskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_transport() {
        let err = AskError::transport("HTTP 500 Internal Server Error");
        assert_eq!(
            err.to_string(),
            "Transport error: HTTP 500 Internal Server Error"
        );
        assert_eq!(err.category(), "Transport Error");
    }

    #[test]
    fn test_error_display_load_not_found() {
        let err = AskError::from(LoadError::NotFound("GoldLoan.xlsx".to_string()));
        assert_eq!(
            err.to_string(),
            "Load error: file 'GoldLoan.xlsx' was not found"
        );
        assert_eq!(err.category(), "Load Error");
    }

    #[test]
    fn test_error_display_artifact_kinds_differ() {
        let envelope = AskError::from(ArtifactError::Envelope("no candidates".to_string()));
        let payload = AskError::from(ArtifactError::Payload("expected value".to_string()));
        assert_eq!(envelope.category(), "Artifact Error");
        assert_ne!(envelope.to_string(), payload.to_string());
        assert!(payload.to_string().contains("JSON payload"));
    }

    #[test]
    fn test_error_evaluation_keeps_expression() {
        let err = AskError::evaluation("name 'os' is not allowed", "os.system('ls')");
        match err {
            AskError::Evaluation { expression, .. } => assert_eq!(expression, "os.system('ls')"),
            other => panic!("expected evaluation error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_display_config() {
        let err = AskError::config("GEMINI_API_KEY is not set");
        assert_eq!(
            err.to_string(),
            "Configuration error: GEMINI_API_KEY is not set"
        );
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AskError>();
    }
}
