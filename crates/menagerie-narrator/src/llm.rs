//! LLM backends over HTTP.
//!
//! Enum dispatch over the two wire protocols, since async methods are not
//! dyn-compatible. Both send one system and one user message and return
//! the first text block of the answer.

use crate::config::{BackendType, LlmBackendConfig};
use crate::error::NarratorError;
use crate::prompt::RenderedPrompt;

/// Answers are one sentence or a tiny JSON object.
const MAX_TOKENS: u32 = 200;

/// Flavor text benefits from variety.
const TEMPERATURE: f64 = 0.9;

/// What shape of answer the caller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerFormat {
    /// Free text.
    Text,
    /// A single JSON object.
    Json,
}

/// An LLM backend that turns a prompt into text.
pub enum LlmBackend {
    /// OpenAI-compatible chat completions API.
    OpenAi(OpenAiBackend),
    /// Anthropic Messages API.
    Anthropic(AnthropicBackend),
}

impl LlmBackend {
    /// Build the backend named by `config`.
    pub fn new(config: &LlmBackendConfig) -> Self {
        match config.backend_type {
            BackendType::OpenAi => Self::OpenAi(OpenAiBackend::new(config)),
            BackendType::Anthropic => Self::Anthropic(AnthropicBackend::new(config)),
        }
    }

    /// Send a prompt and return the response text.
    ///
    /// # Errors
    ///
    /// Returns [`NarratorError::LlmBackend`] if the HTTP call fails or the
    /// response has no text.
    pub async fn complete(
        &self,
        prompt: &RenderedPrompt,
        format: AnswerFormat,
    ) -> Result<String, NarratorError> {
        match self {
            Self::OpenAi(backend) => backend.complete(prompt, format).await,
            Self::Anthropic(backend) => backend.complete(prompt).await,
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible backend
// ---------------------------------------------------------------------------

/// Backend for OpenAI-compatible chat completions APIs.
///
/// Sends requests to `{api_url}/chat/completions`.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// Create a new `OpenAI`-compatible backend.
    pub fn new(config: &LlmBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    async fn complete(
        &self,
        prompt: &RenderedPrompt,
        format: AnswerFormat,
    ) -> Result<String, NarratorError> {
        let url = format!("{}/chat/completions", self.api_url);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });
        if format == AnswerFormat::Json
            && let Some(fields) = body.as_object_mut()
        {
            fields.insert(
                "response_format".to_owned(),
                serde_json::json!({"type": "json_object"}),
            );
        }

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| NarratorError::LlmBackend(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_body_err| "unable to read error body".to_owned());
            return Err(NarratorError::LlmBackend(format!(
                "OpenAI returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NarratorError::LlmBackend(format!("OpenAI response parse failed: {e}")))?;

        extract_openai_content(&json)
    }
}

/// Extract the text content from an `OpenAI` chat completions response.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, NarratorError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            NarratorError::LlmBackend(
                "OpenAI response missing choices[0].message.content".to_owned(),
            )
        })
}

// ---------------------------------------------------------------------------
// Anthropic Messages API backend
// ---------------------------------------------------------------------------

/// Backend for the Anthropic Messages API.
///
/// Uses the `x-api-key` header, carries the system prompt as a top-level
/// field and answers in `content[0].text`.
pub struct AnthropicBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl AnthropicBackend {
    /// Create a new Anthropic Messages API backend.
    pub fn new(config: &LlmBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, NarratorError> {
        let url = format!("{}/messages", self.api_url);

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "system": prompt.system,
            "messages": [
                {"role": "user", "content": prompt.user}
            ]
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| NarratorError::LlmBackend(format!("Anthropic request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_body_err| "unable to read error body".to_owned());
            return Err(NarratorError::LlmBackend(format!(
                "Anthropic returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            NarratorError::LlmBackend(format!("Anthropic response parse failed: {e}"))
        })?;

        extract_anthropic_content(&json)
    }
}

/// Extract the text content from an Anthropic Messages API response.
fn extract_anthropic_content(json: &serde_json::Value) -> Result<String, NarratorError> {
    json.get("content")
        .and_then(|c| c.get(0))
        .and_then(|b| b.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            NarratorError::LlmBackend("Anthropic response missing content[0].text".to_owned())
        })
}
