use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contextor::{ContextorError, FailureKind};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Llm(#[from] ai_llm_service::AiLlmError),

    #[error(transparent)]
    Store(#[from] rag_store::RagError),

    // --- IO / network / server ---
    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    /// Maps a pipeline failure for an endpoint whose 5xx details start with `prefix`
    /// (e.g. `RAG Error`).
    pub fn pipeline(prefix: &'static str, err: ContextorError) -> Self {
        match err.kind() {
            FailureKind::InvalidQuery => AppError::Http {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                code: "INVALID_QUERY",
                message: err.to_string(),
            },
            kind => {
                error!(error = %err, ?kind, "pipeline failed");
                AppError::Http {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: match kind {
                        FailureKind::Generation => "GENERATION_FAILED",
                        _ => "RETRIEVAL_FAILED",
                    },
                    message: format!("{prefix}: {err}"),
                }
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Http { status, .. } => *status,
            // startup-only
            AppError::Llm(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Bind { .. } | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Llm(_) => "LLM_CONFIG_ERROR",
            AppError::Store(_) => "STORE_ERROR",
            AppError::Bind { .. } => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::Http { code, .. } => *code,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: String,
    error: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            detail: self.to_string(),
            error: self.error_code(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Keeps axum's status (400/415/422) for malformed bodies.
impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::Http {
            status: err.status(),
            code: "INVALID_REQUEST",
            message: err.body_text(),
        }
    }
}
