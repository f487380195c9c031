//! POST /ask-with-context: answer plus the display-trimmed chunks behind it.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::ask::query_request::{AskWithContextResponse, QueryRequest},
};

/// Handler: POST /ask-with-context
///
/// Runs answering and retrieval as two independent pipeline calls.
pub async fn ask_with_context(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> AppResult<Json<AskWithContextResponse>> {
    let Json(body) = payload?;
    let n = body.n_results();
    let to_err = |e| AppError::pipeline("RAG Error", e);

    let answer = state
        .pipeline
        .answer(&body.question, n)
        .await
        .map_err(to_err)?;
    let bundle = state
        .pipeline
        .retrieve_context(&body.question, n)
        .await
        .map_err(to_err)?;

    Ok(Json(AskWithContextResponse {
        question: body.question,
        answer,
        retrieved_context: bundle.display_chunks().into(),
    }))
}
