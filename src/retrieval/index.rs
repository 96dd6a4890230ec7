//! In-process vector index persisted as a JSON document.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::embedding::EmbeddingProvider;

use super::corpus::SourceDocument;
use super::error::RetrievalError;
use super::splitter::TextSplitter;

pub const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub source: String,
    pub content: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Embedding model the vectors were produced with.
    pub model: String,
    pub documents: Vec<IndexedChunk>,
}

impl VectorIndex {
    /// Splits and embeds the corpus in one batch.
    pub async fn build(
        documents: &[SourceDocument],
        splitter: &TextSplitter,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self, RetrievalError> {
        let mut chunks: Vec<(String, String)> = Vec::new();
        for doc in documents {
            for piece in splitter.split(&doc.content) {
                chunks.push((doc.source.clone(), piece));
            }
        }

        let texts: Vec<String> = chunks.iter().map(|(_, text)| text.clone()).collect();
        let embeddings = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed(texts).await?
        };
        if embeddings.len() != chunks.len() {
            return Err(RetrievalError::EmbeddingCount {
                expected: chunks.len(),
                actual: embeddings.len(),
            });
        }

        let documents = chunks
            .into_iter()
            .zip(embeddings)
            .map(|((source, content), embedding)| IndexedChunk {
                source,
                content,
                embedding,
            })
            .collect();
        Ok(Self {
            model: embedder.model_name().to_string(),
            documents,
        })
    }

    /// Reads `index.json` from `dir`; `Ok(None)` when there is none yet.
    pub fn load(dir: &Path) -> Result<Option<Self>, RetrievalError> {
        match fs::read(dir.join(INDEX_FILE)) {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, dir: &Path) -> Result<(), RetrievalError> {
        fs::create_dir_all(dir)?;
        let target = dir.join(INDEX_FILE);
        let tmp = target.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(self)?)?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The `k` chunks most similar to `query`, best first.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<&IndexedChunk> {
        let mut scored: Vec<(f32, &IndexedChunk)> = self
            .documents
            .iter()
            .map(|chunk| (cosine_similarity(query, &chunk.embedding), chunk))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().take(k).map(|(_, chunk)| chunk).collect()
    }
}

/// Returns 0.0 when the vectors differ in length or either has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut mag_a, mut mag_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }
    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
