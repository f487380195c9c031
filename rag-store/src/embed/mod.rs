use crate::errors::RagError;
use std::{future::Future, pin::Pin};

/// Provider interface for query embedding.
///
/// This is the embedding function handed to a collection when it is opened;
/// the same function must have produced the stored vectors.
/// Async is required because real providers (Gemini, Ollama) perform HTTP requests.
pub trait EmbeddingsProvider: Send + Sync {
    /// Async embedding function.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>;
}

pub mod llm;
