use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

/// Wrap `router` in tracing, CORS and the request deadline.
///
/// Layers added later wrap the earlier ones, so tracing sees every response,
/// preflights included.
pub fn apply_middleware(router: Router, request_timeout: Duration) -> Router {
    router
        // Bounds the whole pipeline, upstream call included
        .layer(TimeoutLayer::new(request_timeout))
        .layer(axum::middleware::map_response(timeout_as_server_error))
        // The browser extension posts from arbitrary page origins
        .layer(create_cors_layer())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// `TimeoutLayer` answers 408 with an empty body; callers expect a plain-text 500.
async fn timeout_as_server_error(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        tracing::error!("Request exceeded the server deadline");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Request timed out").into_response();
    }
    response
}

/// Creates CORS layer configuration
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false)
}

/// Initialize structured logging: JSON lines in production, readable lines locally.
pub fn init_tracing(format: LogFormat) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(true)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()?,
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()?,
    }

    tracing::info!(format = ?format, "Structured logging initialized");
    Ok(())
}
