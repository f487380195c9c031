//! POST /context: retrieved chunks without generation.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::debug;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::ask::query_request::{ContextResponse, QueryRequest},
};

pub async fn context(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> AppResult<Json<ContextResponse>> {
    let Json(body) = payload?;

    let bundle = state
        .pipeline
        .retrieve_context(&body.question, body.n_results())
        .await
        .map_err(|e| AppError::pipeline("Context Error", e))?;

    debug!(chunks = bundle.documents.len(), "context: done");
    Ok(Json(bundle))
}
