//! OpenRouter provider (OpenAI-compatible chat completions).

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{Explainer, ProviderError};
use crate::config::OpenRouterConfig;
use crate::prompt::PromptStyle;

const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
const APP_TITLE: &str = "Inwen Webhook";

/// OpenRouter chat-completion provider.
pub struct OpenRouterExplainer {
    config: OpenRouterConfig,
    client: Client,
}

impl OpenRouterExplainer {
    pub fn new(config: OpenRouterConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::ClientBuild(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            // json_object rather than json_schema: far more free models accept it
            response_format: self.config.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }
}

#[async_trait]
impl Explainer for OpenRouterExplainer {
    fn name(&self) -> &'static str {
        "OpenRouter"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn prompt_style(&self) -> PromptStyle {
        PromptStyle::InlineJson
    }

    async fn explain(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey(API_KEY_VAR))?;

        let body = serde_json::to_vec(&self.build_request(prompt))
            .map_err(|e| ProviderError::Serialize(e.to_string()))?;

        tracing::info!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            json_mode = self.config.json_mode,
            "Calling OpenRouter API"
        );
        let start = Instant::now();

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", APP_TITLE)
            .body(body)
            .send()
            .await;

        tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "OpenRouter API call finished");

        let response = response.map_err(|e| ProviderError::Network(e.to_string()))?;
        let status = response.status();

        // Read as text first: error bodies are often HTML or plain text.
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        tracing::info!(status = status.as_u16(), "OpenRouter API response status");

        if status != StatusCode::OK {
            return Err(ProviderError::UpstreamStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let completion: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(completion.explanation_text())
    }
}

// ============================================================================
// OpenRouter API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, verbatim.
    fn explanation_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default()
    }
}
