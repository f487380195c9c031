//! Typed error for the contextor crate.

use thiserror::Error;

/// Coarse failure category, used by callers to pick a status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    InvalidQuery,
    Retrieval,
    Generation,
}

#[derive(Debug, Error)]
pub enum ContextorError {
    /// The question or result cap was rejected before any external call.
    #[error("{0}")]
    InvalidQuery(String),

    /// Errors from the underlying rag-store crate.
    #[error("{0}")]
    Retrieval(#[from] rag_store::RagError),

    /// The generative model failed or returned no text.
    #[error("{0}")]
    Generation(#[from] ai_llm_service::AiLlmError),
}

impl ContextorError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ContextorError::InvalidQuery(_) => FailureKind::InvalidQuery,
            ContextorError::Retrieval(_) => FailureKind::Retrieval,
            ContextorError::Generation(_) => FailureKind::Generation,
        }
    }
}
