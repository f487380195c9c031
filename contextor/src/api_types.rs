//! Public API types re-used by external crates (e.g., the HTTP API layer).

use rag_store::Metadata;
use serde::Serialize;

/// Maximum number of characters of a chunk shown to clients.
pub const DISPLAY_LIMIT: usize = 500;

/// Retrieved context for one question, index-aligned and in ranking order.
///
/// `distances` is either empty or the same length as `documents`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContextBundle {
    pub question: String,
    pub documents: Vec<String>,
    pub metadatas: Vec<Metadata>,
    pub distances: Vec<f32>,
}

impl ContextBundle {
    /// Display chunks, one per document; `distance` is `None` when unknown.
    pub fn display_chunks(&self) -> Vec<DisplayChunk> {
        self.documents
            .iter()
            .zip(&self.metadatas)
            .enumerate()
            .map(|(i, (doc, meta))| DisplayChunk {
                source: crate::prompt::source_label(meta).to_string(),
                content: truncate_for_display(doc),
                distance: self.distances.get(i).copied(),
            })
            .collect()
    }
}

/// A trimmed chunk as shown next to an answer.
///
/// # Example
/// ```
/// use contextor::DisplayChunk;
/// let c = DisplayChunk {
///     source: "docs/index.md".into(),
///     content: "MkDocs is a fast, simple static site generator".into(),
///     distance: Some(0.12),
/// };
/// assert_eq!(c.distance, Some(0.12));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisplayChunk {
    pub source: String,
    pub content: String,
    pub distance: Option<f32>,
}

/// First [`DISPLAY_LIMIT`] characters plus `...` when longer; unchanged otherwise.
pub fn truncate_for_display(text: &str) -> String {
    match text.char_indices().nth(DISPLAY_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
