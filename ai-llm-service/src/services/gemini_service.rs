//! Google Gemini service for text generation and embeddings.
//!
//! Minimal, non-streaming client around the Gemini REST API.
//! Endpoints are derived from `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1beta/models/{model}:generateContent: single-turn generation
//! - POST {endpoint}/v1beta/models/{model}:embedContent: query embedding
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::Gemini`
//! - `cfg.api_key` must be present (sent as `x-goog-api-key`, never in the URL)
//! - `cfg.endpoint` must start with http:// or https://

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, HttpError, ProviderError, make_snippet, validate_http_endpoint,
    },
};

const PROVIDER: &str = "Gemini";

/// Task type sent with embedding requests; the collection is searched with query vectors.
const EMBEDDING_TASK_TYPE: &str = "RETRIEVAL_QUERY";

/// Thin client for the Gemini API.
///
/// High-level operations:
/// - [`GeminiService::generate`]  : single, non-streaming `generateContent`
/// - [`GeminiService::embeddings`]: single `embedContent` vector
#[derive(Debug)]
pub struct GeminiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    model_path: String,
    url_generate: String,
    url_embed: String,
}

impl GeminiService {
    /// Creates a new [`GeminiService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::WrongProvider`] if `cfg.provider` is not Gemini
    /// - [`ConfigError::MissingApiKey`] if `cfg.api_key` is `None`
    /// - [`ConfigError::InvalidFormat`] if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Gemini {
            return Err(ConfigError::WrongProvider { expected: PROVIDER }.into());
        }
        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        let api_key = cfg
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey(PROVIDER))?;
        validate_http_endpoint("GEMINI_URL", &cfg.endpoint)?;

        let mut key_header = header::HeaderValue::from_str(api_key).map_err(|_| {
            ConfigError::InvalidFormat {
                var: "GOOGLE_API_KEY",
                reason: "must be a valid header value",
            }
        })?;
        key_header.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert("x-goog-api-key", key_header);

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(60));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = cfg.endpoint.trim().trim_end_matches('/').to_string();
        let model_path = model_path(&cfg.model);
        let url_generate = format!("{base}/v1beta/{model_path}:generateContent");
        let url_embed = format!("{base}/v1beta/{model_path}:embedContent");

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "GeminiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            model_path,
            url_generate,
            url_embed,
        })
    }

    /// Sends `prompt` as a single user turn and returns the first candidate's text.
    ///
    /// Text parts of the first candidate are concatenated.
    ///
    /// # Errors
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`ProviderError::Decode`] if the JSON cannot be parsed
    /// - [`ProviderError::EmptyResponse`] if no candidate carries text
    /// - [`AiLlmError::HttpTransport`] for network failures
    #[instrument(skip_all, fields(model = %self.cfg.model, prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = GenerateContentRequest::from_cfg(&self.cfg, prompt);

        debug!("POST {}", self.url_generate);
        let resp = self.client.post(&self.url_generate).json(&body).send().await?;
        let resp = self.ensure_success(resp, &self.url_generate, started).await?;

        let out: GenerateContentResponse = resp.json().await.map_err(|e| ProviderError::Decode {
            provider: PROVIDER,
            reason: format!("serde error: {e}; expected `candidates[0].content.parts[].text`"),
        })?;

        let text = out.into_text()?;
        debug!(
            latency_ms = started.elapsed().as_millis(),
            answer_len = text.len(),
            "generateContent completed"
        );
        Ok(text)
    }

    /// Embeds `input` with the configured embedding model.
    ///
    /// # Errors
    /// Same classes as [`GeminiService::generate`].
    #[instrument(skip_all, fields(model = %self.cfg.model, input_len = input.len()))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let started = Instant::now();
        let body = EmbedContentRequest {
            model: &self.model_path,
            content: Content {
                role: None,
                parts: vec![Part { text: input }],
            },
            task_type: EMBEDDING_TASK_TYPE,
        };

        debug!("POST {}", self.url_embed);
        let resp = self.client.post(&self.url_embed).json(&body).send().await?;
        let resp = self.ensure_success(resp, &self.url_embed, started).await?;

        let out: EmbedContentResponse = resp.json().await.map_err(|e| ProviderError::Decode {
            provider: PROVIDER,
            reason: format!("serde error: {e}; expected `{{ embedding: {{ values: number[] }} }}`"),
        })?;

        Ok(out.embedding.values)
    }

    async fn ensure_success(
        &self,
        resp: reqwest::Response,
        url: &str,
        started: Instant,
    ) -> Result<reqwest::Response, AiLlmError> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let snippet = make_snippet(&text);

        error!(
            %status,
            %url,
            %snippet,
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "Gemini returned non-success status"
        );

        Err(ProviderError::HttpStatus {
            provider: PROVIDER,
            http: HttpError {
                status,
                url: url.to_string(),
                snippet,
            },
        }
        .into())
    }
}

/// Normalizes a model id to the `models/<id>` resource path Gemini expects.
fn model_path(model: &str) -> String {
    let model = model.trim();
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

/* ==========================
HTTP payloads
========================== */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_cfg(cfg: &LlmModelConfig, prompt: &'a str) -> Self {
        let generation_config = GenerationConfig {
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_output_tokens: cfg.max_tokens,
        };
        let has_options = generation_config.temperature.is_some()
            || generation_config.top_p.is_some()
            || generation_config.max_output_tokens.is_some();

        Self {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: has_options.then_some(generation_config),
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate that has any.
    fn into_text(self) -> Result<String, ProviderError> {
        let mut finish_reason = None;
        for cand in self.candidates {
            if finish_reason.is_none() {
                finish_reason = cand.finish_reason.clone();
            }
            let text: String = cand
                .content
                .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
                .unwrap_or_default();
            if !text.trim().is_empty() {
                return Ok(text);
            }
        }

        let reason = self
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .or(finish_reason)
            .unwrap_or_else(|| "unknown".to_string());
        Err(ProviderError::EmptyResponse {
            provider: PROVIDER,
            reason,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}
