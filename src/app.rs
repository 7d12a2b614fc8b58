use axum::{
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    handlers::{
        health_check,
        webhook::{gemini_webhook, method_not_allowed, openrouter_webhook},
    },
    middleware::apply_middleware,
    providers::{Explainer, GeminiExplainer, OpenRouterExplainer, ProviderError},
};

/// Deadline for one provider call unless configured otherwise.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(75);

/// Shared, immutable per-process state: one explainer per webhook endpoint.
#[derive(Clone)]
pub struct AppState {
    pub gemini: Arc<dyn Explainer>,
    pub openrouter: Arc<dyn Explainer>,
    pub upstream_timeout: Duration,
}

impl AppState {
    pub fn new(gemini: Arc<dyn Explainer>, openrouter: Arc<dyn Explainer>) -> Self {
        Self {
            gemini,
            openrouter,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }

    pub fn with_upstream_timeout(mut self, upstream_timeout: Duration) -> Self {
        self.upstream_timeout = upstream_timeout;
        self
    }

    /// Build the real Gemini and OpenRouter clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let gemini = GeminiExplainer::new(config.gemini.clone())?;
        let openrouter = OpenRouterExplainer::new(config.openrouter.clone())?;

        Ok(Self::new(Arc::new(gemini), Arc::new(openrouter))
            .with_upstream_timeout(config.server.upstream_timeout))
    }
}

/// Create the Axum router with all endpoints and middleware
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let router = Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Webhook endpoints, one per provider
        .route(
            "/webhook/gemini",
            post(gemini_webhook).fallback(method_not_allowed),
        )
        .route(
            "/webhook/openrouter",
            post(openrouter_webhook).fallback(method_not_allowed),
        )
        .with_state(state);

    apply_middleware(router, request_timeout)
}
