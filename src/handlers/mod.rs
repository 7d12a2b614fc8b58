// Handlers module
// HTTP handlers for the webhook relay

pub mod webhook;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

pub const SERVICE_NAME: &str = "inwen-webhook";

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

/// Health check handler
/// Returns `{"status":"healthy","service":"inwen-webhook"}` for monitoring purposes
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            service: SERVICE_NAME,
        }),
    )
}
