//! Core data models used by the library.

use serde::Serialize;
use serde_json::{Map, Value};

/// Per-chunk metadata as stored alongside the chunk (e.g. `file_path`).
pub type Metadata = Map<String, Value>;

/// Query parameters for nearest-neighbor retrieval by text.
#[derive(Clone, Copy, Debug)]
pub struct RagQuery<'a> {
    pub text: &'a str,
    pub n_results: u64,
}

/// Result of one query, ordered by the store's relevance ranking.
///
/// `documents[i]` and `metadatas[i]` describe the same chunk. `distances` is
/// `None` when the store did not report any.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub documents: Vec<String>,
    pub metadatas: Vec<Metadata>,
    pub distances: Option<Vec<f32>>,
}

impl QueryResult {
    /// Number of matched chunks.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
