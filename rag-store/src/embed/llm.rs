//! Embedding provider backed by the shared LLM service.
//!
//! Delegates to the `embedding` profile of [`LlmServiceProfiles`], which talks
//! to Gemini or Ollama depending on configuration.

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use tracing::warn;

use crate::{EmbeddingsProvider, RagError};

/// Embedding provider over the shared [`LlmServiceProfiles`].
#[derive(Clone)]
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
    /// Expected embedding dimension size; `None` accepts any.
    dim: Option<usize>,
}

impl LlmEmbedder {
    /// Construct a new embedder.
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: Option<usize>) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>
    {
        Box::pin(async move {
            let resp = self.svc.embed(text).await?;
            check_dim(resp, self.dim)
        })
    }
}

fn check_dim(vector: Vec<f32>, want: Option<usize>) -> Result<Vec<f32>, RagError> {
    match want {
        Some(want) if vector.len() != want => {
            warn!(got = vector.len(), want, "embedding dimension mismatch");
            Err(RagError::VectorSizeMismatch {
                got: vector.len(),
                want,
            })
        }
        _ => Ok(vector),
    }
}
