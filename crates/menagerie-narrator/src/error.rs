//! Error types for the narrator.
//!
//! None of these reach the game: every public [`Narrator`](crate::Narrator)
//! call swallows its error and answers with a fallback. They exist so the
//! failure can be logged with a cause.

/// Errors that can occur while producing flavor text.
#[derive(Debug, thiserror::Error)]
pub enum NarratorError {
    /// Failed to load or render a prompt template.
    #[error("template error: {0}")]
    Template(String),

    /// An LLM backend returned an error or was unreachable.
    #[error("LLM backend error: {0}")]
    LlmBackend(String),

    /// The response could not be turned into the requested shape.
    #[error("response parse error: {0}")]
    Parse(String),

    /// The request did not finish within the configured timeout.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Environment configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
