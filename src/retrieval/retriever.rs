use std::sync::Arc;

use async_trait::async_trait;

use crate::config::RetrievalConfig;
use crate::embedding::EmbeddingProvider;
use crate::tools::{ToolArgs, ToolDescriptor, ToolHandler};

use super::corpus::{ensure_seeded, load_documents};
use super::error::RetrievalError;
use super::index::VectorIndex;
use super::splitter::TextSplitter;

pub const QUERY_KNOWLEDGE_BASE: &str = "query_knowledge_base";

const DESCRIPTION: &str = "Use this when you need answers from the local knowledge base, \
     such as company policies or product information. Searches for the documents most \
     relevant to the given question. Arguments: query (the question).";

const NO_RESULTS: &str = "No relevant documents found.";

/// Similarity search over the local knowledge base.
pub struct Retriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("chunks", &self.index.len())
            .field("model", &self.index.model)
            .field("top_k", &self.top_k)
            .finish()
    }
}

impl Retriever {
    pub fn new(index: VectorIndex, embedder: Arc<dyn EmbeddingProvider>, top_k: usize) -> Self {
        Self {
            index: Arc::new(index),
            embedder,
            top_k,
        }
    }

    /// Seeds the corpus if needed, then loads the persisted index when it was
    /// built with the current embedding model, or rebuilds and saves it.
    pub async fn initialize(
        config: &RetrievalConfig,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, RetrievalError> {
        let data_dir = config.data_dir.clone();
        let index_dir = config.index_dir.clone();
        let model = embedder.model_name().to_string();

        let (documents, existing) = tokio::task::spawn_blocking(move || {
            ensure_seeded(&data_dir)?;
            let documents = load_documents(&data_dir)?;
            let existing = match VectorIndex::load(&index_dir) {
                Ok(index) => index,
                Err(err) => {
                    log::warn!("ignoring unreadable vector index: {err}");
                    None
                }
            };
            Ok::<_, RetrievalError>((documents, existing))
        })
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))??;

        if documents.is_empty() {
            return Err(RetrievalError::EmptyCorpus(
                config.data_dir.display().to_string(),
            ));
        }

        if let Some(index) = existing.filter(|i| i.model == model && !i.is_empty()) {
            log::info!("loaded vector index with {} chunks", index.len());
            return Ok(Self::new(index, embedder, config.top_k));
        }

        let splitter = TextSplitter::new(config.chunk_size, config.chunk_overlap);
        let index = VectorIndex::build(&documents, &splitter, embedder.as_ref()).await?;
        if let Err(err) = index.save(&config.index_dir) {
            log::warn!("could not persist vector index: {err}");
        }
        log::info!(
            "built vector index with {} chunks from {} documents",
            index.len(),
            documents.len()
        );
        Ok(Self::new(index, embedder, config.top_k))
    }

    /// Renders the best matches as `[source] content` blocks.
    pub async fn search(&self, query: &str) -> Result<String, RetrievalError> {
        let mut vectors = self.embedder.embed(vec![query.to_string()]).await?;
        let Some(vector) = vectors.pop() else {
            return Err(RetrievalError::EmbeddingCount {
                expected: 1,
                actual: 0,
            });
        };

        let index = Arc::clone(&self.index);
        let k = self.top_k;
        let rendered = tokio::task::spawn_blocking(move || {
            index
                .search(&vector, k)
                .into_iter()
                .map(|chunk| format!("[{}] {}", chunk.source, chunk.content))
                .collect::<Vec<_>>()
        })
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;

        if rendered.is_empty() {
            Ok(NO_RESULTS.to_string())
        } else {
            Ok(rendered.join("\n\n"))
        }
    }

    pub fn into_tool(self: Arc<Self>) -> ToolDescriptor {
        ToolDescriptor::new(QUERY_KNOWLEDGE_BASE, DESCRIPTION, self)
    }
}

#[async_trait]
impl ToolHandler for Retriever {
    async fn call(&self, args: ToolArgs) -> String {
        let Some(query) = args.get("query").or_else(|| args.first_value()) else {
            return "Error: missing required argument 'query'.".to_string();
        };
        match self.search(query).await {
            Ok(text) => text,
            Err(err) => {
                log::warn!("knowledge base search failed: {err}");
                format!("Error: knowledge base search failed: {err}")
            }
        }
    }
}
