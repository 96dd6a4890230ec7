use std::io;

use crate::error::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("index format error: {0}")]
    Index(#[from] serde_json::Error),

    #[error("embedding failed: {0}")]
    Embedding(#[from] ModelError),

    #[error("corpus in {0} yielded no documents")]
    EmptyCorpus(String),

    #[error("embedding count mismatch: expected {expected}, got {actual}")]
    EmbeddingCount { expected: usize, actual: usize },
}
