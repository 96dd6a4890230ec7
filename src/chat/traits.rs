use std::fmt;

use async_trait::async_trait;

use crate::error::ModelError;

use super::message::ChatMessage;

pub trait ChatResponse: std::fmt::Debug + std::fmt::Display + Send + Sync {
    fn text(&self) -> Option<String>;
}

/// Trait for providers that support chat-style interactions.
///
/// This is the only contract the orchestration loop needs from a model:
/// an ordered message list in, free text out.
#[async_trait]
pub trait ChatProvider: Sync + Send {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Box<dyn ChatResponse>, ModelError>;

    /// Convenience wrapper returning the response text, empty when the
    /// provider produced none.
    async fn chat_text(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        let response = self.chat(messages).await?;
        Ok(response.text().unwrap_or_default())
    }
}

/// Plain text response, used by in-process providers.
#[derive(Debug, Clone)]
pub struct TextResponse {
    pub text: String,
}

impl TextResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for TextResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl ChatResponse for TextResponse {
    fn text(&self) -> Option<String> {
        Some(self.text.clone())
    }
}
