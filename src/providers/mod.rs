//! Upstream LLM providers.
//!
//! Each provider turns a prompt into the model's raw text. Which provider serves
//! which endpoint is decided by the router, not here.

pub mod gemini;
pub mod openrouter;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::prompt::PromptStyle;

pub use gemini::GeminiExplainer;
pub use openrouter::OpenRouterExplainer;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} environment variable not set")]
    MissingApiKey(&'static str),

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    #[error("Failed to prepare request: {0}")]
    Serialize(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Failed to parse upstream response: {0}")]
    Parse(String),

    #[error("No answer within {0:?}")]
    Timeout(Duration),
}

/// Capability: explain a word, given a prompt, as raw model text.
#[async_trait]
pub trait Explainer: Send + Sync {
    /// Provider name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Model identifier sent upstream.
    fn model(&self) -> &str;

    /// Prompt style matching how this provider constrains its output.
    fn prompt_style(&self) -> PromptStyle;

    /// Send `prompt` upstream once and return the extracted text.
    ///
    /// An empty string means the provider answered without any candidate.
    async fn explain(&self, prompt: &str) -> Result<String, ProviderError>;
}
