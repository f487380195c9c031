//! Runtime and collection configuration.

use std::str::FromStr;

use crate::errors::RagError;

/// Distance function the collection was created with.
///
/// Qdrant reports a *score*; this decides how the score maps back to a
/// lower-is-closer distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine similarity (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

impl DistanceKind {
    /// Converts a Qdrant score into a distance where lower means closer.
    pub fn score_to_distance(self, score: f32) -> f32 {
        match self {
            DistanceKind::Cosine => 1.0 - score,
            DistanceKind::Dot => -score,
            DistanceKind::Euclid => score,
        }
    }
}

impl FromStr for DistanceKind {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(DistanceKind::Cosine),
            "dot" => Ok(DistanceKind::Dot),
            "euclid" | "euclidean" | "l2" => Ok(DistanceKind::Euclid),
            other => Err(RagError::Config(format!("unknown distance `{other}`"))),
        }
    }
}

/// Configuration for retrieval from a pre-populated collection.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Payload key holding the chunk text; every other key is metadata.
    pub document_key: String,
    /// Expected embedding dimensionality; `None` skips the check.
    pub embedding_dim: Option<usize>,
}

impl RagConfig {
    /// Creates a sane default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            exact_search: false,
            document_key: "document".into(),
            embedding_dim: None,
        }
    }

    /// Reads the config from environment variables.
    ///
    /// - `QDRANT_URL` (default `http://127.0.0.1:6334`)
    /// - `QDRANT_API_KEY` (optional)
    /// - `QDRANT_COLLECTION` (default `MkDocsRAG`)
    /// - `QDRANT_DISTANCE` (default `cosine`)
    /// - `RAG_EXACT_SEARCH` (default `false`)
    /// - `RAG_DOCUMENT_KEY` (default `document`)
    /// - `EMBEDDING_DIM` (optional)
    ///
    /// # Errors
    /// Returns `RagError::Config` for unparsable values or a failed [`RagConfig::validate`].
    pub fn from_env() -> Result<Self, RagError> {
        let embedding_dim = match env_opt("EMBEDDING_DIM") {
            Some(v) => Some(v.parse::<usize>().map_err(|_| {
                RagError::Config(format!("EMBEDDING_DIM must be a positive integer, got `{v}`"))
            })?),
            None => None,
        };

        let mut cfg = Self::new_default(
            env_opt("QDRANT_URL").unwrap_or_else(|| "http://127.0.0.1:6334".into()),
            env_opt("QDRANT_COLLECTION").unwrap_or_else(|| "MkDocsRAG".into()),
        );
        cfg.qdrant_api_key = env_opt("QDRANT_API_KEY");
        if let Some(d) = env_opt("QDRANT_DISTANCE") {
            cfg.distance = d.parse()?;
        }
        cfg.exact_search = env_opt("RAG_EXACT_SEARCH").is_some_and(|v| v == "true" || v == "1");
        if let Some(key) = env_opt("RAG_DOCUMENT_KEY") {
            cfg.document_key = key;
        }
        cfg.embedding_dim = embedding_dim;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.document_key.trim().is_empty() {
            return Err(RagError::Config("document_key is empty".into()));
        }
        if self.embedding_dim == Some(0) {
            return Err(RagError::Config("embedding_dim must be > 0".into()));
        }
        Ok(())
    }
}

fn env_opt(k: &str) -> Option<String> {
    std::env::var(k)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
