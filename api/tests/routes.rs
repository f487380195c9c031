use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ai_llm_service::{AiLlmError, TextGenerator};
use api::{AppState, SAMPLE_QUESTIONS, router};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use contextor::RagPipeline;
use rag_store::{Metadata, QueryResult, RagError, VectorCollection};
use serde_json::{Value, json};
use tower::ServiceExt;

struct FakeCollection {
    hits: Option<QueryResult>,
    calls: AtomicUsize,
}

impl VectorCollection for FakeCollection {
    fn query<'a>(
        &'a self,
        _text: &'a str,
        n_results: u64,
    ) -> Pin<Box<dyn Future<Output = Result<QueryResult, RagError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let Some(hits) = &self.hits else {
                return Err(RagError::Qdrant("connection refused".into()));
            };
            let n = n_results as usize;
            Ok(QueryResult {
                documents: hits.documents.iter().take(n).cloned().collect(),
                metadatas: hits.metadatas.iter().take(n).cloned().collect(),
                distances: hits
                    .distances
                    .as_ref()
                    .map(|d| d.iter().take(n).copied().collect()),
            })
        })
    }
}

struct EchoGenerator;

impl TextGenerator for EchoGenerator {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
        Box::pin(async move { Ok(format!("  Answer from {} prompt chars.\n", prompt.len())) })
    }
}

fn meta(path: &str) -> Metadata {
    json!({ "file_path": path, "title": "MkDocs" })
        .as_object()
        .cloned()
        .unwrap()
}

fn three_hits() -> QueryResult {
    QueryResult {
        documents: vec![
            "Install MkDocs with pip install mkdocs.".into(),
            "x".repeat(600),
            "Themes are set in mkdocs.yml.".into(),
        ],
        metadatas: vec![
            meta("docs/user-guide/installation.md"),
            meta("docs/user-guide/configuration.md"),
            meta("docs/user-guide/choosing-your-theme.md"),
        ],
        distances: Some(vec![0.12, 0.25, 0.31]),
    }
}

fn app_with(hits: Option<QueryResult>) -> (Router, Arc<FakeCollection>) {
    let collection = Arc::new(FakeCollection {
        hits,
        calls: AtomicUsize::new(0),
    });
    let pipeline = RagPipeline::new(collection.clone(), Arc::new(EchoGenerator));
    (router(AppState::new(pipeline)), collection)
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.expect("request success");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&body).expect("json body"))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn ask_returns_answer_and_question() {
    let (app, _) = app_with(Some(three_hits()));
    let (status, body) = send(
        app,
        post_json("/ask", json!({"question": "How do I install MkDocs?"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"], "How do I install MkDocs?");
    let answer = body["answer"].as_str().unwrap();
    assert!(!answer.is_empty());
    assert_eq!(answer, answer.trim());
}

#[tokio::test]
async fn ask_reports_store_failure_as_rag_error() {
    let (app, _) = app_with(None);
    let (status, body) = send(
        app,
        post_json("/ask", json!({"question": "How do I install MkDocs?"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("RAG Error: "));
    assert_eq!(body["error"], "RETRIEVAL_FAILED");
}

#[tokio::test]
async fn context_returns_aligned_lists() {
    let (app, _) = app_with(Some(three_hits()));
    let (status, body) = send(
        app,
        post_json(
            "/context",
            json!({"question": "What is a configuration file?", "n_results": 8}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"], "What is a configuration file?");
    assert_eq!(body["documents"].as_array().unwrap().len(), 3);
    assert_eq!(body["metadatas"].as_array().unwrap().len(), 3);
    let distances = body["distances"].as_array().unwrap().len();
    assert!(distances == 3 || distances == 0);
    assert_eq!(
        body["metadatas"][0]["file_path"],
        "docs/user-guide/installation.md"
    );
    // Full text, no display trimming.
    assert_eq!(body["documents"][1].as_str().unwrap().len(), 600);
}

#[tokio::test]
async fn context_failure_uses_context_prefix() {
    let (app, _) = app_with(None);
    let (status, body) = send(app, post_json("/context", json!({"question": "q"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("Context Error: "));
}

#[tokio::test]
async fn ask_with_context_trims_chunks_and_runs_retrieval_twice() {
    let (app, collection) = app_with(Some(three_hits()));
    let (status, body) = send(
        app,
        post_json(
            "/ask-with-context",
            json!({"question": "How to customize themes?", "n_results": 3}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(collection.calls.load(Ordering::SeqCst), 2);
    assert_eq!(body["question"], "How to customize themes?");
    assert!(!body["answer"].as_str().unwrap().is_empty());

    let ctx = &body["retrieved_context"];
    let chunks = ctx["chunks"].as_array().unwrap();
    assert_eq!(ctx["num_chunks"], 3);
    assert_eq!(chunks.len(), 3);

    assert_eq!(chunks[0]["source"], "docs/user-guide/installation.md");
    assert_eq!(chunks[0]["content"], "Install MkDocs with pip install mkdocs.");

    let long = chunks[1]["content"].as_str().unwrap();
    assert_eq!(long, format!("{}...", "x".repeat(500)));
    assert!((chunks[2]["distance"].as_f64().unwrap() - 0.31).abs() < 1e-6);
}

#[tokio::test]
async fn ask_with_context_without_distances_reports_null() {
    let mut hits = three_hits();
    hits.distances = None;
    let (app, _) = app_with(Some(hits));
    let (status, body) = send(
        app,
        post_json("/ask-with-context", json!({"question": "q"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let chunks = body["retrieved_context"]["chunks"].as_array().unwrap();
    assert_eq!(chunks.len(), 3);
    assert!(chunks.iter().all(|c| c["distance"].is_null()));
}

#[tokio::test]
async fn empty_question_and_zero_results_are_rejected() {
    let (app, collection) = app_with(Some(three_hits()));

    let (status, body) = send(app.clone(), post_json("/ask", json!({"question": "  "}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "INVALID_QUERY");

    let (status, body) = send(
        app,
        post_json("/context", json!({"question": "q", "n_results": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "INVALID_QUERY");
    assert_eq!(collection.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_bodies_keep_rejection_status() {
    let (app, _) = app_with(Some(three_hits()));

    let (status, body) = send(app.clone(), post_json("/ask", json!({"n_results": 2}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "INVALID_REQUEST");
    assert!(body["detail"].as_str().unwrap().contains("question"));

    let req = Request::builder()
        .method("POST")
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app.clone(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_REQUEST");

    let req = Request::builder()
        .method("POST")
        .uri("/ask")
        .body(Body::from(r#"{"question":"q"}"#))
        .unwrap();
    let (status, _) = send(app, req).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn sample_questions_count_matches_list() {
    let (app, _) = app_with(None);
    let (status, body) = send(app, get("/sample-questions")).await;

    assert_eq!(status, StatusCode::OK);
    let list = body["sample_questions"].as_array().unwrap();
    assert_eq!(list.len(), 15);
    assert_eq!(body["count"], 15);
    assert_eq!(list[0], SAMPLE_QUESTIONS[0]);
    assert!(body["usage"].as_str().unwrap().contains("POST /ask"));
}

#[tokio::test]
async fn health_and_root_never_touch_the_store() {
    let (app, collection) = app_with(None);

    let (status, body) = send(app.clone(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "service": "MkDocs RAG API"}));

    let (status, body) = send(app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "MkDocs RAG API");
    for path in ["/ask", "/context", "/ask-with-context", "/health", "/sample-questions"] {
        assert!(body["endpoints"].get(path).is_some(), "missing {path}");
    }
    assert_eq!(collection.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (app, _) = app_with(None);
    let req = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://docs.example.org")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.expect("request success");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
