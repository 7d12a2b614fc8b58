// Library root for the Inwen webhook relay

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod prompt;
pub mod providers;

// Re-export commonly used types
pub use app::{create_router, AppState};
pub use error::ApiError;
pub use models::{ExplanationResponse, LookupRequest, WordExplanation};
pub use providers::{Explainer, ProviderError};
