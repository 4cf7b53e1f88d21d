//! Narrator configuration from environment variables.
//!
//! The API key is a secret, so it never lives in `menagerie.yaml`. With no
//! key the narrator runs offline and answers every request with its
//! offline fallback.
//!
//! Variables:
//! - `NARRATOR_API_KEY` -- enables the narrator when set and non-empty
//! - `NARRATOR_BACKEND` -- `anthropic` (default), `openai`, `deepseek`, `ollama`
//! - `NARRATOR_API_URL` -- base URL (default depends on the backend)
//! - `NARRATOR_MODEL` -- model identifier, required with a key
//! - `NARRATOR_TEMPLATES_DIR` -- directory of prompt overrides

use std::path::PathBuf;
use std::time::Duration;

use crate::error::NarratorError;

/// Default base URL for the Anthropic Messages API.
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";

/// Default base URL for OpenAI-compatible APIs.
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Everything the narrator needs to start.
#[derive(Debug, Clone)]
pub struct NarratorSettings {
    /// The backend to call, or `None` to run offline.
    pub backend: Option<LlmBackendConfig>,
    /// Upper bound on one request, including parsing.
    pub request_timeout: Duration,
    /// Directory with prompt template overrides.
    pub templates_dir: Option<PathBuf>,
}

/// Configuration for a single LLM backend.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// The wire protocol.
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.anthropic.com/v1`).
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
}

/// Supported LLM backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible API (works with `OpenAI`, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API.
    Anthropic,
}

impl BackendType {
    /// Parse a backend name, case-insensitively.
    pub fn parse(name: &str) -> Result<Self, NarratorError> {
        match name.trim().to_lowercase().as_str() {
            "openai" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(NarratorError::Config(format!("unknown backend type: {other}"))),
        }
    }

    /// Base URL used when `NARRATOR_API_URL` is not set.
    pub const fn default_url(self) -> &'static str {
        match self {
            Self::OpenAi => OPENAI_API_URL,
            Self::Anthropic => ANTHROPIC_API_URL,
        }
    }
}

impl NarratorSettings {
    /// Offline settings: no backend, every answer is a fallback.
    pub const fn offline(request_timeout: Duration) -> Self {
        Self {
            backend: None,
            request_timeout,
            templates_dir: None,
        }
    }

    /// Load settings from the process environment.
    pub fn from_env(request_timeout: Duration) -> Result<Self, NarratorError> {
        Self::from_lookup(|name| std::env::var(name).ok(), request_timeout)
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        request_timeout: Duration,
    ) -> Result<Self, NarratorError> {
        let templates_dir = lookup("NARRATOR_TEMPLATES_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let Some(api_key) = lookup("NARRATOR_API_KEY").filter(|key| !key.trim().is_empty())
        else {
            return Ok(Self {
                templates_dir,
                ..Self::offline(request_timeout)
            });
        };

        let backend_type = lookup("NARRATOR_BACKEND")
            .map_or(Ok(BackendType::Anthropic), |name| BackendType::parse(&name))?;
        let api_url = lookup("NARRATOR_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| backend_type.default_url().to_owned());
        let model = lookup("NARRATOR_MODEL")
            .filter(|model| !model.trim().is_empty())
            .ok_or_else(|| {
                NarratorError::Config("NARRATOR_MODEL is required with NARRATOR_API_KEY".to_owned())
            })?;

        Ok(Self {
            backend: Some(LlmBackendConfig {
                backend_type,
                api_url: api_url.trim_end_matches('/').to_owned(),
                api_key,
                model,
            }),
            request_timeout,
            templates_dir,
        })
    }
}
