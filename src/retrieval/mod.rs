//! Knowledge-base retrieval exposed as the `query_knowledge_base` tool.

pub mod corpus;
mod error;
pub mod index;
mod retriever;
pub mod splitter;

pub use error::RetrievalError;
pub use index::{cosine_similarity, VectorIndex};
pub use retriever::{Retriever, QUERY_KNOWLEDGE_BASE};
pub use splitter::TextSplitter;
