//! Gemini provider.
//!
//! Calls the `generateContent` REST method directly. When structured output is
//! enabled the word-explanation schema is declared so the model returns JSON.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use super::{Explainer, ProviderError};
use crate::config::GeminiConfig;
use crate::models::WordExplanation;
use crate::prompt::PromptStyle;

const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Gemini text provider.
pub struct GeminiExplainer {
    config: GeminiConfig,
    client: Client,
}

impl GeminiExplainer {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ProviderError::ClientBuild(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        let generation_config = self.config.structured_output.then(|| GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: WordExplanation::response_schema(),
        });

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config,
        }
    }
}

#[async_trait]
impl Explainer for GeminiExplainer {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn prompt_style(&self) -> PromptStyle {
        if self.config.structured_output {
            PromptStyle::Schema
        } else {
            PromptStyle::InlineJson
        }
    }

    async fn explain(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey(API_KEY_VAR))?;

        let request = self.build_request(prompt);

        tracing::info!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            structured = self.config.structured_output,
            "Calling Gemini API"
        );
        let start = Instant::now();

        let response = self
            .client
            .post(self.api_url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await;

        tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "Gemini API call finished");

        let response = response.map_err(|e| ProviderError::Network(e.to_string()))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(api_response.explanation_text())
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, each followed by a newline.
    fn explanation_text(&self) -> String {
        self.candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .fold(String::new(), |mut acc, text| {
                        acc.push_str(text);
                        acc.push('\n');
                        acc
                    })
            })
            .unwrap_or_default()
    }
}
