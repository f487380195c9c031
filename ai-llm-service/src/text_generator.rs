//! Generation abstraction consumed by the retrieval pipeline.

use std::{future::Future, pin::Pin};

use crate::error_handler::AiLlmError;

/// Asynchronous single-prompt text generator.
///
/// Implemented by [`crate::service_profiles::LlmServiceProfiles`]; tests plug in
/// their own implementations.
pub trait TextGenerator: Send + Sync {
    /// Sends one prompt and returns the raw generated text.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>>;
}
