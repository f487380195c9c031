//! LLM providers for the docs RAG service.
//!
//! - [`service_profiles::LlmServiceProfiles`]: one generation and one embedding profile
//! - [`text_generator::TextGenerator`]: the seam the pipeline generates through
//! - Provider clients: Gemini (default) and Ollama

pub mod config {
    pub mod default_config;
    pub mod llm_model_config;
    pub mod llm_provider;
}
pub mod error_handler;
pub mod service_profiles;
pub mod services {
    pub mod gemini_service;
    pub mod ollama_service;
}
pub mod text_generator;

pub use error_handler::AiLlmError;
pub use service_profiles::LlmServiceProfiles;
pub use text_generator::TextGenerator;
