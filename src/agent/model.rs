use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::OnceCell;

use crate::backends::ollama::Ollama;
use crate::chat::ChatProvider;
use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::health::HealthProvider;

type ProviderFactory =
    Box<dyn Fn() -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, ModelError>> + Send + Sync>;

/// Lazily connected chat model shared by every turn.
///
/// The first successful connection is kept for the life of the handle.
/// A failed attempt is not cached; the next turn tries again.
pub struct ModelHandle {
    provider: OnceCell<Arc<dyn ChatProvider>>,
    factory: ProviderFactory,
}

impl ModelHandle {
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Arc<dyn ChatProvider>, ModelError>>
            + Send
            + 'static,
    {
        Self {
            provider: OnceCell::new(),
            factory: Box::new(move || Box::pin(factory())),
        }
    }

    /// Wraps an already constructed provider.
    pub fn ready(provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            provider: OnceCell::new_with(Some(provider)),
            factory: Box::new(|| {
                Box::pin(async { Err(ModelError::Generic("model already initialized".into())) })
            }),
        }
    }

    /// Ollama-backed handle; with `verify_on_connect` the server is probed
    /// before the model is handed out.
    pub fn ollama(config: ModelConfig) -> Self {
        let config = Arc::new(config);
        Self::new(move || {
            let config = Arc::clone(&config);
            async move {
                let client = Ollama::new(
                    config.base_url.clone(),
                    config.resolved_api_key(),
                    Some(config.chat_model.clone()),
                    Some(config.embedding_model.clone()),
                    config.temperature,
                    Some(config.timeout_seconds),
                    None,
                )?;
                if config.verify_on_connect {
                    client.health_check().await.map_err(|err| {
                        ModelError::Unavailable(format!(
                            "model server at {} is not responding: {err}",
                            config.base_url
                        ))
                    })?;
                }
                log::info!("using model {} at {}", client.model(), client.base_url());
                Ok(Arc::new(client) as Arc<dyn ChatProvider>)
            }
        })
    }

    pub async fn get(&self) -> Result<Arc<dyn ChatProvider>, ModelError> {
        self.provider
            .get_or_try_init(|| (self.factory)())
            .await
            .cloned()
    }

    pub fn is_connected(&self) -> bool {
        self.provider.initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn failed_connection_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let handle = ModelHandle::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(ModelError::Unavailable("down".into()))
                } else {
                    Ok(Arc::new(ScriptedProvider::new(["hi"])) as Arc<dyn ChatProvider>)
                }
            }
        });

        assert!(handle.get().await.err().unwrap().is_unavailable());
        assert!(!handle.is_connected());
        handle.get().await.unwrap();
        handle.get().await.unwrap();
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn verify_on_connect_reports_unreachable_server() {
        let handle = ModelHandle::ollama(ModelConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            verify_on_connect: true,
            timeout_seconds: 2,
            ..ModelConfig::default()
        });
        assert!(handle.get().await.err().unwrap().is_unavailable());
    }
}
