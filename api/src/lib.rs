//! HTTP surface of the docs RAG service.

pub mod core {
    pub mod app_state;
}
pub mod error_handler;
mod routes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

pub use crate::core::app_state::AppState;
pub use error_handler::{AppError, AppResult};
pub use routes::info_routes::{SAMPLE_QUESTIONS, SERVICE_NAME};

use crate::routes::{
    ask::{ask_route::ask, ask_with_context_route::ask_with_context},
    context::context_route::context,
    info_routes::{health, root, sample_questions},
};

/// Builds the router with permissive CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ask", post(ask))
        .route("/context", post(context))
        .route("/ask-with-context", post(ask_with_context))
        .route("/health", get(health))
        .route("/sample-questions", get(sample_questions))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serves the router on `addr` until Ctrl+C.
pub async fn start(state: AppState, addr: &str) -> Result<(), AppError> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
