//! Default LLM configs loaded from environment variables.
//!
//! This module provides convenience constructors for [`LlmModelConfig`],
//! grouped by provider and role. Two roles exist:
//!
//! - **Generation** → answers questions from a prompt
//! - **Embedding**  → turns query text into a vector for the vector store
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_PROVIDER`     = `gemini` (default) or `ollama`
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = optional generation timeout (u64)
//!
//! Gemini-specific:
//! - `GOOGLE_API_KEY`         = API key (mandatory)
//! - `GEMINI_URL`             = API base (default `https://generativelanguage.googleapis.com`)
//! - `GEMINI_MODEL`           = generation model (default `gemini-2.0-flash`)
//! - `GEMINI_EMBEDDING_MODEL` = embedding model (default `models/embedding-001`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = generation model (mandatory)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_u32, env_opt_u64, env_or, must_env,
        validate_http_endpoint,
    },
};

pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_EMBEDDING_MODEL: &str = "models/embedding-001";

const GENERATION_TIMEOUT_SECS: u64 = 120;
const EMBEDDING_TIMEOUT_SECS: u64 = 30;

/// Resolves the `(generation, embedding)` pair for the provider named by
/// `LLM_PROVIDER` (Gemini when unset).
///
/// # Errors
/// Propagates [`ConfigError`]s from the provider-specific constructors.
pub fn configs_from_env() -> Result<(LlmModelConfig, LlmModelConfig), AiLlmError> {
    let provider: LlmProvider = env_or("LLM_PROVIDER", "gemini").parse()?;
    match provider {
        LlmProvider::Gemini => Ok((config_gemini_generation()?, config_gemini_embedding()?)),
        LlmProvider::Ollama => Ok((config_ollama_generation()?, config_ollama_embedding()?)),
    }
}

/// Constructs a config for the Gemini **generation** model.
///
/// # Env
/// - `GOOGLE_API_KEY` (required)
/// - `GEMINI_URL`, `GEMINI_MODEL`, `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS` (optional)
pub fn config_gemini_generation() -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env("GOOGLE_API_KEY")?;
    let endpoint = gemini_endpoint()?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Gemini,
        model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
        endpoint,
        api_key: Some(api_key),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: None,
        top_p: None,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(GENERATION_TIMEOUT_SECS)),
    })
}

/// Constructs a config for the Gemini **embedding** model.
///
/// # Env
/// - `GOOGLE_API_KEY` (required)
/// - `GEMINI_URL`, `GEMINI_EMBEDDING_MODEL` (optional)
pub fn config_gemini_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env("GOOGLE_API_KEY")?;
    let endpoint = gemini_endpoint()?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Gemini,
        model: env_or("GEMINI_EMBEDDING_MODEL", DEFAULT_GEMINI_EMBEDDING_MODEL),
        endpoint,
        api_key: Some(api_key),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(EMBEDDING_TIMEOUT_SECS),
    })
}

/// Constructs a config for the Ollama **generation** model.
///
/// # Env
/// - `OLLAMA_URL` or `OLLAMA_PORT` (required)
/// - `OLLAMA_MODEL` (required)
/// - `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS` (optional)
///
/// # Defaults
/// - `temperature = Some(0.2)`
pub fn config_ollama_generation() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("OLLAMA_MODEL")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(GENERATION_TIMEOUT_SECS)),
    })
}

/// Constructs a config for the Ollama **embedding** model.
///
/// # Env
/// - `OLLAMA_URL` or `OLLAMA_PORT` (required)
/// - `EMBEDDING_MODEL` (required)
pub fn config_ollama_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("EMBEDDING_MODEL")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(EMBEDDING_TIMEOUT_SECS),
    })
}

fn gemini_endpoint() -> Result<String, AiLlmError> {
    let url = env_or("GEMINI_URL", DEFAULT_GEMINI_URL);
    validate_http_endpoint("GEMINI_URL", &url)?;
    Ok(url)
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            validate_http_endpoint("OLLAMA_URL", &url)?;
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}
