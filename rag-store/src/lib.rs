//! Retrieval over a pre-populated Qdrant collection of documentation chunks.
//!
//! This crate provides a small API to:
//! - Open a named collection, failing fast when it does not exist
//! - Embed a question and fetch the nearest chunks with their metadata and distances
//!
//! The design is flat and splits responsibilities into focused modules.

mod config;
mod embed;
mod errors;
mod qdrant_facade;
mod record;
mod retrieve;

pub use config::{DistanceKind, RagConfig};
pub use embed::EmbeddingsProvider;
pub use embed::llm::LlmEmbedder;
pub use errors::RagError;
pub use record::{Metadata, QueryResult, RagQuery};

use std::{future::Future, pin::Pin, sync::Arc};

use tracing::{debug, info, trace};

/// A searchable collection of embedded documentation chunks.
///
/// Implemented by [`QdrantCollection`]; tests substitute in-memory fakes.
pub trait VectorCollection: Send + Sync {
    /// Returns up to `n_results` chunks nearest to `text`, best match first.
    fn query<'a>(
        &'a self,
        text: &'a str,
        n_results: u64,
    ) -> Pin<Box<dyn Future<Output = Result<QueryResult, RagError>> + Send + 'a>>;
}

/// Handle to an existing Qdrant collection plus the embedding function its
/// vectors were produced with.
///
/// This is the single entry point recommended for application code.
pub struct QdrantCollection {
    cfg: RagConfig,
    client: qdrant_facade::QdrantFacade,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl QdrantCollection {
    /// Connects to Qdrant and checks that the configured collection exists.
    ///
    /// # Errors
    /// Returns `RagError::Config` for bad settings, `RagError::CollectionNotFound`
    /// when the collection is missing, or `RagError::Qdrant` on transport failures.
    pub async fn open(
        cfg: RagConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
    ) -> Result<Self, RagError> {
        trace!("QdrantCollection::open collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        client.ensure_exists().await?;
        info!(
            collection = %cfg.collection,
            distance = ?cfg.distance,
            exact = cfg.exact_search,
            "vector collection opened"
        );
        Ok(Self {
            cfg,
            client,
            embedder,
        })
    }

    /// Name of the underlying collection.
    pub fn name(&self) -> &str {
        &self.client.collection
    }
}

impl VectorCollection for QdrantCollection {
    fn query<'a>(
        &'a self,
        text: &'a str,
        n_results: u64,
    ) -> Pin<Box<dyn Future<Output = Result<QueryResult, RagError>> + Send + 'a>> {
        Box::pin(async move {
            debug!(n_results, "QdrantCollection::query");
            retrieve::query_text(
                &self.cfg,
                &self.client,
                self.embedder.as_ref(),
                RagQuery { text, n_results },
            )
            .await
        })
    }
}
