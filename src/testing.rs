//! In-process fakes shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::chat::{ChatMessage, ChatProvider, ChatResponse, TextResponse};
use crate::embedding::EmbeddingProvider;
use crate::error::ModelError;

/// Embeds text as keyword presence flags plus a constant bias term.
pub struct KeywordEmbedder {
    pub calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(input
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                ["lunch", "smartphone", "tablet"]
                    .iter()
                    .map(|kw| if lower.contains(kw) { 1.0 } else { 0.0 })
                    .chain(std::iter::once(0.1))
                    .collect()
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "keyword"
    }
}

/// Fails the first `failures` calls as unreachable, then embeds like
/// [`KeywordEmbedder`].
pub struct FlakyEmbedder {
    failures: usize,
    pub calls: AtomicUsize,
    inner: KeywordEmbedder,
}

impl FlakyEmbedder {
    pub fn failing_first(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
            inner: KeywordEmbedder::new(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for FlakyEmbedder {
    async fn embed(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>, ModelError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(ModelError::Unavailable("embedding backend restarting".into()));
        }
        self.inner.embed(input).await
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

/// Always reports the embedding backend as unreachable.
pub struct OfflineEmbedder;

#[async_trait]
impl EmbeddingProvider for OfflineEmbedder {
    async fn embed(&self, _input: Vec<String>) -> Result<Vec<Vec<f32>>, ModelError> {
        Err(ModelError::Unavailable("embedding backend offline".into()))
    }

    fn model_name(&self) -> &str {
        "offline"
    }
}

/// Replays queued replies and records every prompt it receives.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, ModelError>>>,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_results(replies.into_iter().map(|r| Ok(r.into())))
    }

    pub fn with_results(replies: impl IntoIterator<Item = Result<String, ModelError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<Vec<ChatMessage>> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Box<dyn ChatResponse>, ModelError> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Generic("script exhausted".into())))?;
        Ok(Box::new(TextResponse::new(reply)))
    }
}
