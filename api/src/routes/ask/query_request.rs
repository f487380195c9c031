use contextor::{ContextBundle, DEFAULT_N_RESULTS, DisplayChunk};
use serde::{Deserialize, Serialize};

/// Request payload shared by /ask, /context and /ask-with-context.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Natural language question.
    pub question: String,
    /// Optional override: number of chunks to retrieve.
    #[serde(default)]
    pub n_results: Option<u64>,
}

impl QueryRequest {
    pub fn n_results(&self) -> u64 {
        self.n_results.unwrap_or(DEFAULT_N_RESULTS)
    }
}

/// Response payload for /ask.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub question: String,
}

/// Response payload for /context; the bundle as retrieved.
pub type ContextResponse = ContextBundle;

/// Response payload for /ask-with-context.
#[derive(Debug, Serialize)]
pub struct AskWithContextResponse {
    pub question: String,
    pub answer: String,
    pub retrieved_context: RetrievedContext,
}

#[derive(Debug, Serialize)]
pub struct RetrievedContext {
    pub num_chunks: usize,
    pub chunks: Vec<DisplayChunk>,
}

impl From<Vec<DisplayChunk>> for RetrievedContext {
    fn from(chunks: Vec<DisplayChunk>) -> Self {
        Self {
            num_chunks: chunks.len(),
            chunks,
        }
    }
}
