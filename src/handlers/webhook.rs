// Webhook handlers
// Decode a lookup, prompt the provider bound to the endpoint, shape the answer

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    models::{ExplanationResponse, LookupRequest},
    prompt::build_prompt,
    providers::{Explainer, ProviderError},
};

/// Explain a word with Gemini
/// POST /webhook/gemini
pub async fn gemini_webhook(
    State(state): State<AppState>,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> ApiResult<Json<ExplanationResponse>> {
    relay(state.gemini.as_ref(), state.upstream_timeout, payload).await
}

/// Explain a word with OpenRouter
/// POST /webhook/openrouter
pub async fn openrouter_webhook(
    State(state): State<AppState>,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> ApiResult<Json<ExplanationResponse>> {
    relay(state.openrouter.as_ref(), state.upstream_timeout, payload).await
}

/// Any non-POST method on a webhook path.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn relay(
    explainer: &dyn Explainer,
    upstream_timeout: Duration,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> ApiResult<Json<ExplanationResponse>> {
    let Json(request) = payload?;
    request.validate().map_err(ApiError::validation)?;

    log_lookup(explainer, &request);

    let prompt = build_prompt(&request, explainer.prompt_style());
    let text = tokio::time::timeout(upstream_timeout, explainer.explain(&prompt))
        .await
        .unwrap_or(Err(ProviderError::Timeout(upstream_timeout)))
        .map_err(|e| ApiError::provider(explainer.name(), e))?;

    let response = ExplanationResponse::new(text);
    if response.is_empty() {
        // Still a success: callers render an empty explanation.
        warn!(provider = explainer.name(), word = %request.word, "Provider returned no candidates");
    } else {
        info!(
            provider = explainer.name(),
            chars = response.explanation.chars().count(),
            "Explanation received"
        );
        debug!(provider = explainer.name(), content = %response.explanation, "Explanation content");
    }

    Ok(Json(response))
}

fn log_lookup(explainer: &dyn Explainer, request: &LookupRequest) {
    let lag_ms = request
        .client_timestamp()
        .map(|sent| (Utc::now() - sent).num_milliseconds());

    info!(
        provider = explainer.name(),
        model = explainer.model(),
        target_language = request.target_language(),
        word = %request.word,
        context = %request.context,
        source = %request.source,
        language = %request.language,
        timestamp = %request.timestamp,
        lag_ms,
        "Received webhook"
    );
}
