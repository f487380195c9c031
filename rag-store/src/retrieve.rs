//! Retrieval: embed query text, search, and split payloads into documents and metadata.

use serde_json::Value;
use tracing::trace;

use crate::config::{DistanceKind, RagConfig};
use crate::embed::EmbeddingsProvider;
use crate::errors::RagError;
use crate::qdrant_facade::QdrantFacade;
use crate::record::{Metadata, QueryResult, RagQuery};

/// Embeds the query text and returns the matched chunks in store order.
///
/// # Errors
/// Returns embedding/provider errors or Qdrant failures.
pub async fn query_text(
    cfg: &RagConfig,
    client: &QdrantFacade,
    provider: &dyn EmbeddingsProvider,
    query: RagQuery<'_>,
) -> Result<QueryResult, RagError> {
    trace!(n_results = query.n_results, "retrieve::query_text");

    let qv = provider.embed(query.text).await?;
    let hits = client.search(qv, query.n_results, cfg.exact_search).await?;

    let result = hits_to_result(hits, &cfg.document_key, cfg.distance);
    trace!(hits = result.len(), "retrieve::query_text done");
    Ok(result)
}

/// Splits `(score, payload)` hits into aligned documents, metadatas and distances.
///
/// The chunk text lives under `document_key`; all other payload keys are
/// metadata. A payload without text yields an empty document.
pub(crate) fn hits_to_result(
    hits: Vec<(f32, Value)>,
    document_key: &str,
    distance: DistanceKind,
) -> QueryResult {
    let mut documents = Vec::with_capacity(hits.len());
    let mut metadatas = Vec::with_capacity(hits.len());
    let mut distances = Vec::with_capacity(hits.len());

    for (score, payload) in hits {
        let mut metadata = match payload {
            Value::Object(m) => m,
            _ => Metadata::new(),
        };
        let document = match metadata.remove(document_key) {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        documents.push(document);
        metadatas.push(metadata);
        distances.push(distance.score_to_distance(score));
    }

    QueryResult {
        documents,
        metadatas,
        distances: Some(distances),
    }
}
