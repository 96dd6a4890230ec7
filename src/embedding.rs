use async_trait::async_trait;

use crate::error::ModelError;

/// Trait for providers that turn text into dense vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed every input, returning one vector per input in the same order.
    async fn embed(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>, ModelError>;

    /// Identifier of the embedding model, recorded alongside a persisted index.
    fn model_name(&self) -> &str;
}
