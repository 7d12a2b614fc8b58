use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

use inwen_webhook::{
    app::{create_router, AppState},
    config::Config,
    middleware::init_tracing,
};

#[tokio::main]
async fn main() {
    // Load .env before anything reads the environment, RUST_LOG included
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize structured logging
    if let Err(e) = init_tracing(config.environment.log_format()) {
        eprintln!("Failed to initialize tracing: {}", e);
        std::process::exit(1);
    }

    if !dotenv_loaded {
        warn!(".env file not found, using system environment variables");
    }
    info!(environment = ?config.environment, "Configuration loaded successfully");

    // Missing keys are reported per request; flag them early as well
    if config.gemini.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set, /webhook/gemini will fail");
    }
    if config.openrouter.api_key.is_none() {
        warn!("OPENROUTER_API_KEY is not set, /webhook/openrouter will fail");
    }

    // Build provider clients
    let state = match AppState::from_config(&config) {
        Ok(state) => {
            info!(
                gemini_model = %config.gemini.model,
                openrouter_model = %config.openrouter.model,
                "Provider clients initialized"
            );
            state
        }
        Err(e) => {
            error!("Failed to initialize provider clients: {}", e);
            std::process::exit(1);
        }
    };

    // Create the Axum router with all endpoints
    let app = create_router(state, config.server.request_timeout);

    // Create socket address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("Server listening on {}", addr);
            info!("Available endpoints: POST /webhook/gemini, POST /webhook/openrouter, GET /health");
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Start the server with graceful shutdown handling
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Graceful shutdown signal handler
/// Listens for SIGTERM and SIGINT signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        },
    }
}
