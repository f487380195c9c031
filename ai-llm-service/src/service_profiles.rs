//! Shared LLM service with two profiles: `generation` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once at startup, wrap in `Arc`, and pass clones to dependents.
//! - Builds one provider client per profile up front; nothing is created per request.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::service_profiles::LlmServiceProfiles;
//! use ai_llm_service::config::default_config::configs_from_env;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (generation, embedding) = configs_from_env()?;
//! let svc = Arc::new(LlmServiceProfiles::new(generation, embedding)?);
//!
//! let txt = svc.generate("Say hello").await?;
//! let emb = svc.embed("Ferris").await?;
//! println!("{txt} / dim={}", emb.len());
//! # Ok(()) }
//! ```

use std::{future::Future, pin::Pin};

use tracing::info;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{gemini_service::GeminiService, ollama_service::OllamaService},
    text_generator::TextGenerator,
};

/// Provider client bound to one profile.
#[derive(Debug)]
enum ProviderClient {
    Gemini(GeminiService),
    Ollama(OllamaService),
}

impl ProviderClient {
    fn new(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(match cfg.provider {
            LlmProvider::Gemini => ProviderClient::Gemini(GeminiService::new(cfg.clone())?),
            LlmProvider::Ollama => ProviderClient::Ollama(OllamaService::new(cfg.clone())?),
        })
    }
}

/// Shared service that manages the **generation** and **embedding** profiles.
#[derive(Debug)]
pub struct LlmServiceProfiles {
    generation_cfg: LlmModelConfig,
    embedding_cfg: LlmModelConfig,
    generation: ProviderClient,
    embedding: ProviderClient,
}

impl LlmServiceProfiles {
    /// Creates a new service and eagerly builds both provider clients.
    ///
    /// # Errors
    /// Returns [`AiLlmError::Config`] if either config is invalid for its provider.
    pub fn new(generation: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self, AiLlmError> {
        let generation_client = ProviderClient::new(&generation)?;
        let embedding_client = ProviderClient::new(&embedding)?;

        info!(
            generation_provider = ?generation.provider,
            generation_model = %generation.model,
            embedding_provider = ?embedding.provider,
            embedding_model = %embedding.model,
            "LlmServiceProfiles initialized"
        );

        Ok(Self {
            generation_cfg: generation,
            embedding_cfg: embedding,
            generation: generation_client,
            embedding: embedding_client,
        })
    }

    /// Generates text using the **generation** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the provider call fails.
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        match &self.generation {
            ProviderClient::Gemini(cli) => cli.generate(prompt).await,
            ProviderClient::Ollama(cli) => cli.generate(prompt).await,
        }
    }

    /// Computes embeddings using the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the provider call fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match &self.embedding {
            ProviderClient::Gemini(cli) => cli.embeddings(input).await,
            ProviderClient::Ollama(cli) => cli.embeddings(input).await,
        }
    }

    /// Returns references to the current profiles `(generation, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.generation_cfg, &self.embedding_cfg)
    }
}

impl TextGenerator for LlmServiceProfiles {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
        Box::pin(LlmServiceProfiles::generate(self, prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gemini(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Gemini,
            model: model.into(),
            endpoint: "https://generativelanguage.googleapis.com".into(),
            api_key: Some("k".into()),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn builds_clients_for_both_profiles() {
        let svc = LlmServiceProfiles::new(gemini("gemini-2.0-flash"), gemini("embedding-001"))
            .unwrap();
        let (g, e) = svc.profiles();
        assert_eq!(g.model, "gemini-2.0-flash");
        assert_eq!(e.model, "embedding-001");
        assert!(matches!(svc.generation, ProviderClient::Gemini(_)));
    }

    #[test]
    fn invalid_embedding_profile_fails_construction() {
        let mut bad = gemini("embedding-001");
        bad.api_key = None;
        assert!(LlmServiceProfiles::new(gemini("gemini-2.0-flash"), bad).is_err());
    }
}
