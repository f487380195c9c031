use std::sync::Arc;

use ai_llm_service::{LlmServiceProfiles, config::default_config::configs_from_env};
use contextor::RagPipeline;
use rag_store::{LlmEmbedder, QdrantCollection, RagConfig};
use tracing::info;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Retrieval + generation pipeline, built once at startup.
    pub pipeline: Arc<RagPipeline>,
}

impl AppState {
    pub fn new(pipeline: RagPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Builds the model clients and opens the vector collection from environment variables.
    ///
    /// Fails when the configuration is invalid or the collection does not exist.
    pub async fn from_env() -> Result<Self, AppError> {
        let (generation, embedding) = configs_from_env()?;
        let profiles = Arc::new(LlmServiceProfiles::new(generation, embedding)?);

        let rag_cfg = RagConfig::from_env()?;
        let embedder = Arc::new(LlmEmbedder::new(profiles.clone(), rag_cfg.embedding_dim));
        let collection = QdrantCollection::open(rag_cfg, embedder).await?;

        let (generation, embedding) = profiles.profiles();
        info!(
            collection = collection.name(),
            provider = ?generation.provider,
            model = %generation.model,
            embedding_model = %embedding.model,
            "RAG pipeline ready"
        );

        Ok(Self::new(RagPipeline::new(Arc::new(collection), profiles)))
    }
}
