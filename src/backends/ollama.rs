//! Ollama client implementation for chat, embedding and health checks.
//!
//! Talks to a local Ollama server over its native REST API:
//! `/api/chat` (non-streaming), `/api/embed` and `/api/tags`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatProvider, ChatResponse};
use crate::embedding::EmbeddingProvider;
use crate::error::ModelError;
use crate::health::HealthProvider;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_CHAT_MODEL: &str = "llama3.1:8b";
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Configuration for the Ollama client.
#[derive(Debug)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server, without trailing slash.
    pub base_url: String,
    /// Optional bearer token, for servers behind an authenticating proxy.
    pub api_key: Option<SecretString>,
    /// Chat model identifier.
    pub model: String,
    /// Embedding model identifier.
    pub embedding_model: String,
    /// Sampling temperature for response randomness.
    pub temperature: Option<f32>,
    /// System prompt prepended to every chat request.
    pub system: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// Client for interacting with an Ollama server.
///
/// The client uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct Ollama {
    pub config: Arc<OllamaConfig>,
    pub client: Client,
}

#[derive(Serialize)]
struct OllamaChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaChatMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Deserialize, Debug)]
struct OllamaChatResponse {
    message: Option<OllamaResponseMessage>,
}

#[derive(Deserialize, Debug)]
struct OllamaResponseMessage {
    #[serde(default)]
    content: String,
}

impl std::fmt::Display for OllamaChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}", message.content),
            None => write!(f, "{self:?}"),
        }
    }
}

impl ChatResponse for OllamaChatResponse {
    fn text(&self) -> Option<String> {
        self.message.as_ref().map(|m| m.content.clone())
    }
}

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize, Debug)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl Ollama {
    /// Builds a client with its own HTTP connection pool.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: Option<String>,
        embedding_model: Option<String>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
        system: Option<String>,
    ) -> Result<Self, ModelError> {
        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(sec));
        }
        let client = builder
            .build()
            .map_err(|err| ModelError::Unavailable(format!("failed to build HTTP client: {err}")))?;
        Ok(Self::with_client(
            client,
            base_url,
            api_key,
            model,
            embedding_model,
            temperature,
            timeout_seconds,
            system,
        ))
    }

    /// Creates a new Ollama client with a custom HTTP client.
    #[allow(clippy::too_many_arguments)]
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: Option<String>,
        embedding_model: Option<String>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
        system: Option<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            config: Arc::new(OllamaConfig {
                base_url,
                api_key: api_key.filter(|k| !k.is_empty()).map(SecretString::new),
                model: model.unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
                embedding_model: embedding_model
                    .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
                temperature,
                system,
                timeout_seconds,
            }),
            client,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key.expose_secret()),
            None => request,
        }
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ModelError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ModelError::AuthError(format!("{status}: {body}")));
    }
    Err(ModelError::ProviderError(format!(
        "Ollama returned {status}: {body}"
    )))
}

#[async_trait]
impl ChatProvider for Ollama {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Box<dyn ChatResponse>, ModelError> {
        let mut ollama_msgs: Vec<OllamaChatMessage> = messages
            .iter()
            .map(|m| OllamaChatMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect();

        if let Some(system) = &self.config.system {
            ollama_msgs.insert(
                0,
                OllamaChatMessage {
                    role: "system",
                    content: system,
                },
            );
        }

        let body = OllamaChatRequest {
            model: &self.config.model,
            messages: ollama_msgs,
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        };

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("Ollama chat payload: {}", json);
            }
        }

        let request = self.authorize(self.client.post(self.endpoint("/api/chat")).json(&body));
        let resp = request.send().await?;
        log::debug!("Ollama chat HTTP status: {}", resp.status());
        let resp = check_status(resp).await?;

        let raw = resp.text().await?;
        let parsed: OllamaChatResponse =
            serde_json::from_str(&raw).map_err(|err| ModelError::ResponseFormatError {
                message: err.to_string(),
                raw_response: raw.clone(),
            })?;
        if parsed.message.is_none() {
            return Err(ModelError::ResponseFormatError {
                message: "missing 'message' field".to_string(),
                raw_response: raw,
            });
        }
        Ok(Box::new(parsed))
    }
}

#[async_trait]
impl EmbeddingProvider for Ollama {
    async fn embed(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>, ModelError> {
        if input.is_empty() {
            return Ok(Vec::new());
        }
        let body = OllamaEmbedRequest {
            model: &self.config.embedding_model,
            input: &input,
        };
        let request = self.authorize(self.client.post(self.endpoint("/api/embed")).json(&body));
        let resp = check_status(request.send().await?).await?;
        let parsed: OllamaEmbedResponse = resp.json().await?;
        if parsed.embeddings.len() != input.len() {
            return Err(ModelError::ResponseFormatError {
                message: format!(
                    "expected {} embeddings, got {}",
                    input.len(),
                    parsed.embeddings.len()
                ),
                raw_response: String::new(),
            });
        }
        Ok(parsed.embeddings)
    }

    fn model_name(&self) -> &str {
        &self.config.embedding_model
    }
}

#[async_trait]
impl HealthProvider for Ollama {
    async fn health_check(&self) -> Result<(), ModelError> {
        let request = self.authorize(self.client.get(self.endpoint("/api/tags")));
        check_status(request.send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatMessage;

    fn client_for(server: &mockito::ServerGuard) -> Ollama {
        Ollama::with_client(
            Client::new(),
            server.url(),
            None,
            Some("test-model".to_string()),
            Some("test-embed".to_string()),
            Some(0.2),
            None,
            None,
        )
    }

    #[tokio::test]
    async fn chat_returns_message_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "test-model",
                "stream": false,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"model":"test-model","message":{"role":"assistant","content":"hi there"},"done":true}"#)
            .create_async()
            .await;

        let ollama = client_for(&server);
        let msgs = [ChatMessage::user().content("hello").build()];
        let text = ollama.chat_text(&msgs).await.unwrap();

        assert_eq!(text, "hi there");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn chat_maps_server_errors_to_provider_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(500)
            .with_body("model not loaded")
            .create_async()
            .await;

        let ollama = client_for(&server);
        let msgs = [ChatMessage::user().content("hello").build()];
        let err = ollama.chat(&msgs).await.unwrap_err();

        assert!(matches!(err, ModelError::ProviderError(ref msg) if msg.contains("model not loaded")));
    }

    #[tokio::test]
    async fn chat_rejects_body_without_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(r#"{"done":true}"#)
            .create_async()
            .await;

        let ollama = client_for(&server);
        let msgs = [ChatMessage::user().content("hello").build()];
        let err = ollama.chat(&msgs).await.unwrap_err();

        assert!(matches!(err, ModelError::ResponseFormatError { .. }));
    }

    #[tokio::test]
    async fn embed_returns_one_vector_per_input() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/embed")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "test-embed",
                "input": ["a", "b"]
            })))
            .with_status(200)
            .with_body(r#"{"model":"test-embed","embeddings":[[1.0,0.0],[0.0,1.0]]}"#)
            .create_async()
            .await;

        let ollama = client_for(&server);
        let vectors = ollama
            .embed(vec!["a".to_string(), "b".to_string()])
            .await
            .unwrap();

        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(ollama.model_name(), "test-embed");
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        // Port 9 (discard) on localhost is essentially never listening.
        let ollama = Ollama::with_client(
            Client::new(),
            "http://127.0.0.1:9",
            None,
            None,
            None,
            None,
            None,
            None,
        );
        let err = ollama.health_check().await.unwrap_err();
        assert!(err.is_unavailable());
    }
}
