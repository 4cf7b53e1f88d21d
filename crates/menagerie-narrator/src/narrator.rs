//! The text service the game talks to.
//!
//! Every method answers. Offline (no credential) each request returns its
//! offline fallback without touching the network. Online, a failed,
//! malformed or slow request returns its failure fallback. Each request
//! is bounded by the configured timeout.

use std::time::Duration;

use menagerie_types::RandomEvent;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::NarratorSettings;
use crate::error::NarratorError;
use crate::llm::{AnswerFormat, LlmBackend};
use crate::parse::{self, MIN_EVENT_COINS};
use crate::prompt::{PromptEngine, RenderedPrompt};

/// Fact shown when the narrator is offline.
pub fn offline_fact(name: &str) -> String {
    format!("Take good care of {name}!")
}

/// Fact shown when a request fails or times out.
pub const FAILED_FACT: &str = "Your pet is feeling great!";

/// Fact shown when the model answers with nothing.
pub const EMPTY_FACT: &str = "Caring for pets helps you relax!";

/// Event message when the narrator is offline.
pub const OFFLINE_EVENT: &str = "You found a lucky coin!";

/// Event message when a request fails or times out.
pub const FAILED_EVENT: &str = "It's a beautiful day!";

/// Name suggested when the narrator is offline.
pub fn offline_name(species: &str) -> String {
    format!("{species} Jr.")
}

/// Name suggested when a request fails, times out or comes back empty.
pub fn failed_name(species: &str) -> String {
    format!("{species} Junior")
}

/// Flavor-text generator with deterministic fallbacks.
pub struct Narrator {
    backend: Option<LlmBackend>,
    prompts: PromptEngine,
    request_timeout: Duration,
}

impl Narrator {
    /// Build a narrator from settings.
    ///
    /// # Errors
    ///
    /// [`NarratorError::Template`] if a prompt template fails to load.
    pub fn new(settings: &NarratorSettings) -> Result<Self, NarratorError> {
        let prompts = match settings.templates_dir {
            Some(ref dir) => PromptEngine::with_overrides(dir)?,
            None => PromptEngine::builtin()?,
        };
        let backend = settings.backend.as_ref().map(LlmBackend::new);
        match backend {
            Some(ref b) => info!(
                backend = b.name(),
                timeout_ms = settings.request_timeout.as_millis(),
                "Narrator online"
            ),
            None => info!("Narrator offline, using fallback text"),
        }
        Ok(Self {
            backend,
            prompts,
            request_timeout: settings.request_timeout,
        })
    }

    /// A narrator that never calls out.
    ///
    /// # Errors
    ///
    /// [`NarratorError::Template`] if the built-in templates fail to load.
    pub fn offline() -> Result<Self, NarratorError> {
        Self::new(&NarratorSettings::offline(Duration::from_secs(10)))
    }

    /// Whether a backend is configured.
    pub const fn is_online(&self) -> bool {
        self.backend.is_some()
    }

    /// A short fact about a pet's species.
    pub async fn fact(&self, name: &str, species: &str, habitat: &str) -> String {
        let Some(backend) = self.backend.as_ref() else {
            return offline_fact(name);
        };
        let answer = match self.prompts.fact(name, species, habitat) {
            Ok(prompt) => self.ask(backend, &prompt, AnswerFormat::Text).await,
            Err(e) => Err(e),
        };
        match answer {
            Ok(text) => parse::clean_fact(&text).unwrap_or_else(|| EMPTY_FACT.to_owned()),
            Err(error) => {
                warn!(%error, species, "Fact request failed, using fallback");
                FAILED_FACT.to_owned()
            }
        }
    }

    /// A random in-game event with a coin grant.
    pub async fn random_event(&self) -> RandomEvent {
        let Some(backend) = self.backend.as_ref() else {
            return fallback_event(OFFLINE_EVENT);
        };
        let answer = match self.prompts.random_event() {
            Ok(prompt) => self.ask(backend, &prompt, AnswerFormat::Json).await,
            Err(e) => Err(e),
        };
        match answer.and_then(|text| parse::parse_event(&text)) {
            Ok(event) => event,
            Err(error) => {
                warn!(%error, "Random event request failed, using fallback");
                fallback_event(FAILED_EVENT)
            }
        }
    }

    /// A cute name for a new pet.
    pub async fn name_for(&self, species: &str) -> String {
        let Some(backend) = self.backend.as_ref() else {
            return offline_name(species);
        };
        let answer = match self.prompts.name(species) {
            Ok(prompt) => self.ask(backend, &prompt, AnswerFormat::Text).await,
            Err(e) => Err(e),
        };
        match answer {
            Ok(text) => parse::clean_name(&text).unwrap_or_else(|| {
                debug!(species, "Empty name suggestion");
                failed_name(species)
            }),
            Err(error) => {
                warn!(%error, species, "Name request failed, using fallback");
                failed_name(species)
            }
        }
    }

    async fn ask(
        &self,
        backend: &LlmBackend,
        prompt: &RenderedPrompt,
        format: AnswerFormat,
    ) -> Result<String, NarratorError> {
        let limit_ms = u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX);
        let text = timeout(self.request_timeout, backend.complete(prompt, format))
            .await
            .map_err(|_elapsed| NarratorError::Timeout(limit_ms))??;
        debug!(backend = backend.name(), chars = text.len(), "Narrator answered");
        Ok(text)
    }
}

fn fallback_event(message: &str) -> RandomEvent {
    RandomEvent {
        message: message.to_owned(),
        coins: MIN_EVENT_COINS,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::config::{BackendType, LlmBackendConfig};

    fn online(api_url: String, backend_type: BackendType, limit: Duration) -> Narrator {
        Narrator::new(&NarratorSettings {
            backend: Some(LlmBackendConfig {
                backend_type,
                api_url,
                api_key: "test".to_owned(),
                model: "test-model".to_owned(),
            }),
            request_timeout: limit,
            templates_dir: None,
        })
        .unwrap()
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text
            .lines()
            .take_while(|l| !l.is_empty())
            .find_map(|l| {
                let (key, value) = l.split_once(':')?;
                if key.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        request.len() >= head_end.saturating_add(4).saturating_add(length)
    }

    /// Answer one HTTP request with a JSON body.
    async fn serve_once(body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = vec![0_u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend(buf.iter().take(n));
                if request_complete(&request) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    /// Accept connections and never answer.
    async fn black_hole() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn offline_fallbacks() {
        let narrator = Narrator::offline().unwrap();
        assert!(!narrator.is_online());
        assert_eq!(
            narrator.fact("Goldie", "Goldfish", "Aquarium").await,
            "Take good care of Goldie!"
        );
        assert_eq!(narrator.name_for("Goldfish").await, "Goldfish Jr.");
        let event = narrator.random_event().await;
        assert_eq!(event.message, "You found a lucky coin!");
        assert_eq!(event.coins, 10);
    }

    #[tokio::test]
    async fn unreachable_backend_uses_failure_fallbacks() {
        // Bind then drop to get a port nobody listens on.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let narrator = online(
            format!("http://{addr}"),
            BackendType::OpenAi,
            Duration::from_secs(5),
        );
        assert_eq!(
            narrator.fact("Rex", "Dog", "Zoo").await,
            "Your pet is feeling great!"
        );
        assert_eq!(narrator.name_for("Dog").await, "Dog Junior");
        let event = narrator.random_event().await;
        assert_eq!(event.message, "It's a beautiful day!");
        assert_eq!(event.coins, 10);
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let narrator = online(
            black_hole().await,
            BackendType::Anthropic,
            Duration::from_millis(100),
        );
        assert_eq!(narrator.name_for("Cat").await, "Cat Junior");
    }

    #[tokio::test]
    async fn anthropic_answer_is_cleaned() {
        let body = serde_json::json!({"content": [{"type": "text", "text": "\"Whiskers\"\n"}]});
        let narrator = online(
            serve_once(body.to_string()).await,
            BackendType::Anthropic,
            Duration::from_secs(5),
        );
        assert_eq!(narrator.name_for("Cat").await, "Whiskers");
    }

    #[tokio::test]
    async fn openai_event_is_parsed_and_clamped() {
        let content = "```json\n{\"message\": \"A tourist tipped you!\", \"coins\": 900}\n```";
        let body = serde_json::json!({"choices": [{"message": {"content": content}}]});
        let narrator = online(
            serve_once(body.to_string()).await,
            BackendType::OpenAi,
            Duration::from_secs(5),
        );
        let event = narrator.random_event().await;
        assert_eq!(event.message, "A tourist tipped you!");
        assert_eq!(event.coins, 100);
    }

    #[tokio::test]
    async fn empty_fact_gets_its_own_fallback() {
        let body = serde_json::json!({"choices": [{"message": {"content": "   "}}]});
        let narrator = online(
            serve_once(body.to_string()).await,
            BackendType::OpenAi,
            Duration::from_secs(5),
        );
        assert_eq!(
            narrator.fact("Rex", "Dog", "Zoo").await,
            "Caring for pets helps you relax!"
        );
    }
}
