//! Retrieval-augmented answering over a documentation collection.
//!
//! Public API: [`RagPipeline`]. It retrieves the nearest chunks for a
//! question from a [`VectorCollection`], builds a labeled context block and a
//! single prompt, calls the [`TextGenerator`], and returns the trimmed answer.

mod api_types;
mod error;
pub mod prompt;

pub use api_types::{ContextBundle, DISPLAY_LIMIT, DisplayChunk, truncate_for_display};
pub use error::{ContextorError, FailureKind};

use std::sync::Arc;

use ai_llm_service::{AiLlmError, TextGenerator, error_handler::ProviderError};
use rag_store::{RagError, VectorCollection};
use tracing::{debug, info, instrument, warn};

/// Number of chunks retrieved when the caller does not specify one.
pub const DEFAULT_N_RESULTS: u64 = 8;

/// Retrieval-then-prompt pipeline over injected store and model handles.
///
/// Cheap to share behind an `Arc`; holds no mutable state.
pub struct RagPipeline {
    collection: Arc<dyn VectorCollection>,
    generator: Arc<dyn TextGenerator>,
}

impl RagPipeline {
    pub fn new(collection: Arc<dyn VectorCollection>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            collection,
            generator,
        }
    }

    /// Retrieves up to `n_results` chunks for `question`, in store ranking order.
    ///
    /// `distances` in the bundle is aligned with `documents` or empty.
    ///
    /// # Errors
    /// `InvalidQuery` for a blank question or `n_results == 0`; `Retrieval`
    /// for any store or embedding failure.
    #[instrument(skip_all, fields(n_results = n_results))]
    pub async fn retrieve_context(
        &self,
        question: &str,
        n_results: u64,
    ) -> Result<ContextBundle, ContextorError> {
        validate(question, n_results)?;

        let res = self.collection.query(question, n_results).await?;
        if res.documents.len() != res.metadatas.len() {
            return Err(RagError::Malformed(format!(
                "{} documents but {} metadatas",
                res.documents.len(),
                res.metadatas.len()
            ))
            .into());
        }

        let distances = match res.distances {
            Some(d) if d.len() == res.documents.len() => d,
            Some(d) => {
                warn!(
                    distances = d.len(),
                    documents = res.documents.len(),
                    "dropping distances not aligned with documents"
                );
                Vec::new()
            }
            None => Vec::new(),
        };

        debug!(chunks = res.documents.len(), "context retrieved");
        Ok(ContextBundle {
            question: question.to_string(),
            documents: res.documents,
            metadatas: res.metadatas,
            distances,
        })
    }

    /// Answers `question` from the retrieved context with one model call.
    ///
    /// # Errors
    /// `InvalidQuery`, `Retrieval` (store failures) or `Generation` (model
    /// failures, including an empty or blocked response). Never partial.
    #[instrument(skip_all, fields(n_results = n_results))]
    pub async fn answer(&self, question: &str, n_results: u64) -> Result<String, ContextorError> {
        let bundle = self.retrieve_context(question, n_results).await?;

        let context = prompt::build_context_block(&bundle.documents, &bundle.metadatas);
        let full_prompt = prompt::build_prompt(question, &context);
        debug!(prompt_chars = full_prompt.len(), "prompt built");

        let answer = self.generator.generate(&full_prompt).await?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(AiLlmError::from(ProviderError::EmptyResponse {
                provider: "generator",
                reason: "blank text".into(),
            })
            .into());
        }
        info!(chunks = bundle.documents.len(), "answer generated");
        Ok(answer.to_string())
    }
}

fn validate(question: &str, n_results: u64) -> Result<(), ContextorError> {
    if question.trim().is_empty() {
        return Err(ContextorError::InvalidQuery(
            "question must not be empty".into(),
        ));
    }
    if n_results == 0 {
        return Err(ContextorError::InvalidQuery(
            "n_results must be at least 1".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_store::{Metadata, QueryResult};
    use serde_json::json;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    struct FakeCollection {
        result: Result<QueryResult, String>,
    }

    impl VectorCollection for FakeCollection {
        fn query<'a>(
            &'a self,
            _text: &'a str,
            n_results: u64,
        ) -> Pin<Box<dyn Future<Output = Result<QueryResult, RagError>> + Send + 'a>> {
            let out = match &self.result {
                Ok(r) => {
                    let n = n_results as usize;
                    Ok(QueryResult {
                        documents: r.documents.iter().take(n).cloned().collect(),
                        metadatas: r.metadatas.iter().take(n).cloned().collect(),
                        distances: r
                            .distances
                            .as_ref()
                            .map(|d| d.iter().take(n).copied().collect()),
                    })
                }
                Err(e) => Err(RagError::CollectionNotFound(e.clone())),
            };
            Box::pin(async move { out })
        }
    }

    #[derive(Default)]
    struct FakeGenerator {
        reply: Option<String>,
        seen: Mutex<Vec<String>>,
    }

    impl TextGenerator for FakeGenerator {
        fn generate<'a>(
            &'a self,
            prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
            Box::pin(async move {
                self.seen.lock().unwrap().push(prompt.to_string());
                self.reply.clone().ok_or_else(|| {
                    AiLlmError::Provider(ProviderError::EmptyResponse {
                        provider: "Fake",
                        reason: "SAFETY".into(),
                    })
                })
            })
        }
    }

    fn meta(path: &str) -> Metadata {
        json!({ "file_path": path }).as_object().cloned().unwrap()
    }

    fn three_hits(distances: Option<Vec<f32>>) -> QueryResult {
        QueryResult {
            documents: vec!["install".into(), "config".into(), "themes".into()],
            metadatas: vec![meta("install.md"), meta("config.md"), meta("themes.md")],
            distances,
        }
    }

    fn pipeline(
        result: Result<QueryResult, String>,
        reply: Option<&str>,
    ) -> (RagPipeline, Arc<FakeGenerator>) {
        let generator = Arc::new(FakeGenerator {
            reply: reply.map(str::to_string),
            ..Default::default()
        });
        let p = RagPipeline::new(Arc::new(FakeCollection { result }), generator.clone());
        (p, generator)
    }

    #[tokio::test]
    async fn retrieve_caps_results_and_keeps_alignment() {
        let (p, _) = pipeline(Ok(three_hits(Some(vec![0.1, 0.2, 0.3]))), None);

        let b = p.retrieve_context("How to customize themes?", 2).await.unwrap();
        assert_eq!(b.documents.len(), 2);
        assert_eq!(b.metadatas.len(), 2);
        assert_eq!(b.distances, vec![0.1, 0.2]);
        assert_eq!(b.question, "How to customize themes?");
    }

    #[tokio::test]
    async fn missing_or_misaligned_distances_become_empty() {
        let (p, _) = pipeline(Ok(three_hits(None)), None);
        assert!(p.retrieve_context("q", 8).await.unwrap().distances.is_empty());

        let (p, _) = pipeline(Ok(three_hits(Some(vec![0.1]))), None);
        let b = p.retrieve_context("q", 8).await.unwrap();
        assert_eq!(b.documents.len(), 3);
        assert!(b.distances.is_empty());
    }

    #[tokio::test]
    async fn misaligned_metadatas_are_a_retrieval_failure() {
        let mut bad = three_hits(None);
        bad.metadatas.pop();
        let (p, _) = pipeline(Ok(bad), None);
        let err = p.retrieve_context("q", 8).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Retrieval);
    }

    #[tokio::test]
    async fn invalid_queries_are_rejected_before_the_store() {
        let (p, _) = pipeline(Err("never reached".into()), None);
        let err = p.retrieve_context("   ", 8).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidQuery);
        let err = p.answer("q", 0).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidQuery);
    }

    #[tokio::test]
    async fn answer_builds_labeled_prompt_and_trims_reply() {
        let (p, g) = pipeline(
            Ok(three_hits(Some(vec![0.1, 0.2, 0.3]))),
            Some("\n  Run pip install mkdocs.  \n"),
        );

        let a = p.answer("How do I install MkDocs?", 8).await.unwrap();
        assert_eq!(a, "Run pip install mkdocs.");

        let seen = g.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let prompt = &seen[0];
        assert!(prompt.contains("[Source: install.md]\ninstall\n\n---\n\n[Source: config.md]"));
        assert!(prompt.contains("Question: How do I install MkDocs?"));
    }

    #[tokio::test]
    async fn zero_matches_still_produce_an_answer() {
        let (p, g) = pipeline(Ok(QueryResult::default()), Some("No context available."));
        let a = p.answer("What is a configuration file?", 8).await.unwrap();
        assert!(!a.is_empty());
        assert!(g.seen.lock().unwrap()[0].contains("Context from MkDocs documentation:\n\n\n"));
    }

    #[tokio::test]
    async fn whitespace_only_reply_is_a_generation_failure() {
        let (p, g) = pipeline(Ok(QueryResult::default()), Some("  \n\t "));
        let err = p.answer("How do I install MkDocs?", 8).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Generation);
        assert!(err.to_string().contains("no text"));
        assert_eq!(g.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn store_and_model_failures_are_tagged() {
        let (p, g) = pipeline(Err("MkDocsRAG".into()), Some("unused"));
        let err = p.answer("q", 8).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Retrieval);
        assert!(err.to_string().contains("MkDocsRAG"));
        assert!(g.seen.lock().unwrap().is_empty());

        let (p, _) = pipeline(Ok(three_hits(None)), None);
        let err = p.answer("q", 8).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Generation);
        assert!(err.to_string().contains("SAFETY"));
    }
}
