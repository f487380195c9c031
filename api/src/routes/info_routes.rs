//! Static routes: GET /, GET /health, GET /sample-questions.

use std::collections::BTreeMap;

use axum::Json;
use serde::Serialize;

pub const SERVICE_NAME: &str = "MkDocs RAG API";

/// Example questions clients can send to POST /ask.
pub const SAMPLE_QUESTIONS: [&str; 15] = [
    "How do I install MkDocs?",
    "What is a configuration file?",
    "How to customize themes?",
    "What are plugins in MkDocs?",
    "How to deploy documentation?",
    "What is the structure of mkdocs.yml?",
    "How do I create a new MkDocs project?",
    "What themes are available in MkDocs?",
    "How to add navigation to my documentation?",
    "What is the difference between mkdocs.yml and mkdocs.yaml?",
    "How to use markdown extensions?",
    "How to build and serve documentation locally?",
    "What are the requirements for running MkDocs?",
    "How to configure search functionality?",
    "How to add custom CSS to my documentation?",
];

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SampleQuestionsResponse {
    pub sample_questions: Vec<&'static str>,
    pub count: usize,
    pub usage: &'static str,
}

/// Handler: GET /
pub async fn root() -> Json<RootResponse> {
    let endpoints = BTreeMap::from([
        ("/ask", "POST - Ask a question about MkDocs"),
        ("/context", "POST - Get retrieved context for a question"),
        (
            "/ask-with-context",
            "POST - Ask a question and get the answer with its retrieved context",
        ),
        ("/health", "GET - Health check"),
        ("/sample-questions", "GET - Example questions to try"),
    ]);
    Json(RootResponse {
        message: SERVICE_NAME,
        endpoints,
    })
}

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
    })
}

/// Handler: GET /sample-questions
pub async fn sample_questions() -> Json<SampleQuestionsResponse> {
    Json(SampleQuestionsResponse {
        sample_questions: SAMPLE_QUESTIONS.to_vec(),
        count: SAMPLE_QUESTIONS.len(),
        usage: "Use these questions with POST /ask endpoint",
    })
}
