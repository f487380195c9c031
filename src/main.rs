mod telemetry;

use anyhow::Context;
use api::AppState;
use tracing::info;

const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file; a missing file is fine.
    dotenvy::dotenv().ok();

    telemetry::init().context("setting default subscriber failed")?;

    let addr = std::env::var("API_ADDRESS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string());

    let state = AppState::from_env()
        .await
        .context("failed to initialise RAG pipeline")?;
    info!(%addr, "MkDocs RAG API starting");

    api::start(state, &addr).await.context("server failed")?;

    Ok(())
}
