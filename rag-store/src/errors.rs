//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The collection does not exist in the store.
    #[error("collection `{0}` does not exist")]
    CollectionNotFound(String),

    /// Embedding provider failure.
    #[error("embedding error: {0}")]
    Embedding(#[from] ai_llm_service::AiLlmError),

    /// Query embedding size differs from the configured dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// The store answered with a result that breaks the index alignment contract.
    #[error("malformed query result: {0}")]
    Malformed(String),
}
