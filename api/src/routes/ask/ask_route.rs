//! POST /ask: answers a question with RAG context.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::debug;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::ask::query_request::{AskResponse, QueryRequest},
};

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"How do I install MkDocs?","n_results":5}'
/// ```
pub async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> AppResult<Json<AskResponse>> {
    let Json(body) = payload?;
    debug!(n_results = body.n_results(), "ask: start");

    let answer = state
        .pipeline
        .answer(&body.question, body.n_results())
        .await
        .map_err(|e| AppError::pipeline("RAG Error", e))?;

    Ok(Json(AskResponse {
        answer,
        question: body.question,
    }))
}
