use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::providers::ProviderError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{provider} provider error: {source}")]
    Provider {
        provider: &'static str,
        #[source]
        source: ProviderError,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn provider(provider: &'static str, source: ProviderError) -> Self {
        Self::Provider { provider, source }
    }

    /// Status code and plain-text body written to the caller.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
            }
            ApiError::InvalidPayload(_) => {
                (StatusCode::BAD_REQUEST, "Invalid JSON payload".to_string())
            }
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Provider { provider, source } => {
                let message = match source {
                    ProviderError::MissingApiKey(_) => "API key missing".to_string(),
                    ProviderError::ClientBuild(_) => format!("Failed to create {} client", provider),
                    ProviderError::Serialize(_) => "Failed to prepare request".to_string(),
                    ProviderError::Network(_) => format!("Failed to call {} API", provider),
                    ProviderError::UpstreamStatus { status, .. } => {
                        format!("{} API error: {}", provider, status)
                    }
                    ProviderError::Parse(_) => "Failed to parse response".to_string(),
                    ProviderError::Timeout(_) => format!("{} API timed out", provider),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::MethodNotAllowed => tracing::debug!("Rejected request with unsupported method"),
            ApiError::InvalidPayload(reason) => tracing::warn!("Invalid JSON payload: {}", reason),
            ApiError::Validation(message) => tracing::debug!("Validation error: {}", message),
            ApiError::Provider { provider, source } => match source {
                ProviderError::MissingApiKey(var) => {
                    tracing::error!(provider = *provider, "{} environment variable not set", var)
                }
                ProviderError::UpstreamStatus { status, body } => {
                    tracing::error!(provider = *provider, status = *status, body = %body, "Upstream API error")
                }
                other => tracing::error!(provider = *provider, "Provider error: {}", other),
            },
        }

        let (status, message) = self.status_and_message();
        (status, message).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidPayload(rejection.body_text())
    }
}

// Result type alias for convenience
pub type ApiResult<T> = Result<T, ApiError>;
