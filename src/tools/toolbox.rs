use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::config::RetrievalConfig;
use crate::embedding::EmbeddingProvider;
use crate::retrieval::{RetrievalError, Retriever};

use super::files::file_tools;
use super::registry::ToolRegistry;
use super::sandbox::Sandbox;

/// Lazily assembled tool registry shared by every turn.
///
/// The first caller builds the retrieval index and the registry; concurrent
/// callers wait on the same initialization. When retrieval cannot be set up
/// the turn gets the file tools only, and the next call tries again.
pub struct ToolBox {
    sandbox: Arc<Sandbox>,
    retrieval: Option<(RetrievalConfig, Arc<dyn EmbeddingProvider>)>,
    registry: OnceCell<ToolRegistry>,
    file_only: OnceCell<ToolRegistry>,
}

impl ToolBox {
    pub fn new(sandbox: Arc<Sandbox>) -> Self {
        Self {
            sandbox,
            retrieval: None,
            registry: OnceCell::new(),
            file_only: OnceCell::new(),
        }
    }

    pub fn with_retrieval(
        mut self,
        config: RetrievalConfig,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        if config.enabled {
            self.retrieval = Some((config, embedder));
        }
        self
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub async fn registry(&self) -> &ToolRegistry {
        let Some((config, embedder)) = &self.retrieval else {
            return self
                .registry
                .get_or_init(|| async { self.file_registry() })
                .await;
        };

        let built = self
            .registry
            .get_or_try_init(|| async {
                let retriever = Retriever::initialize(config, Arc::clone(embedder)).await?;
                let mut registry = ToolRegistry::new();
                registry.register(Arc::new(retriever).into_tool());
                registry.extend(file_tools(Arc::clone(&self.sandbox)));
                log::debug!("tool registry ready: {:?}", registry.tool_names());
                Ok::<_, RetrievalError>(registry)
            })
            .await;

        match built {
            Ok(registry) => registry,
            Err(err) => {
                log::warn!("knowledge base unavailable, continuing without it: {err}");
                self.file_only
                    .get_or_init(|| async { self.file_registry() })
                    .await
            }
        }
    }

    fn file_registry(&self) -> ToolRegistry {
        let registry: ToolRegistry = file_tools(Arc::clone(&self.sandbox)).into_iter().collect();
        log::debug!("tool registry ready: {:?}", registry.tool_names());
        registry
    }
}
