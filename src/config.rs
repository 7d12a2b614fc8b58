use std::collections::HashMap;
use std::env;
use std::time::Duration;
use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_OPENROUTER_MODEL: &str = "openrouter/auto:free";
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub openrouter: OpenRouterConfig,
    pub environment: Environment,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Bounds the whole inbound request.
    pub request_timeout: Duration,
    /// Deadline for a single provider call; kept below `request_timeout`.
    pub upstream_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub structured_output: bool,
}

#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    /// Sent upstream as `HTTP-Referer`.
    pub referer: String,
    pub json_mode: bool,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Local,
    Production,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// `.env` is not read here; `main` loads it before logging is initialized
    /// so that `RUST_LOG` from the file takes effect.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let request_timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "90".to_string())
            .parse::<u64>()
            .context("REQUEST_TIMEOUT_SECS must be a valid number of seconds")?;

        let upstream_timeout_secs = lookup("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|| "75".to_string())
            .parse::<u64>()
            .context("UPSTREAM_TIMEOUT_SECS must be a valid number of seconds")?;

        let environment = Environment::parse(&lookup("ENV").unwrap_or_else(|| "local".to_string()));

        let config = Config {
            server: ServerConfig {
                port,
                request_timeout: Duration::from_secs(request_timeout_secs),
                upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            },
            gemini: GeminiConfig::from_lookup(&lookup)?,
            openrouter: OpenRouterConfig::from_lookup(&lookup)?,
            environment,
        };

        config.validate()?;
        Ok(config)
    }

    /// Convenience for tests and tooling: build from a fixed set of variables.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("PORT must be greater than 0");
        }

        if self.server.request_timeout.as_secs() == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        if self.server.upstream_timeout.as_secs() == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECS must be greater than 0");
        }

        // Otherwise the inbound timeout fires first and the caller gets a bare 408
        if self.server.request_timeout <= self.server.upstream_timeout {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than UPSTREAM_TIMEOUT_SECS");
        }

        self.gemini.validate()?;
        self.openrouter.validate()?;

        if self.server.request_timeout <= self.openrouter.timeout {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than OPENROUTER_TIMEOUT_SECS");
        }

        Ok(())
    }
}

impl GeminiConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let structured_output = parse_flag(lookup("GEMINI_STRUCTURED_OUTPUT"), true)
            .context("GEMINI_STRUCTURED_OUTPUT must be true or false")?;

        Ok(GeminiConfig {
            api_key: non_empty(lookup("GEMINI_API_KEY")),
            model: non_empty(lookup("GEMINI_MODEL"))
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            api_base: non_empty(lookup("GEMINI_API_BASE_URL"))
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            structured_output,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !is_http_url(&self.api_base) {
            anyhow::bail!("GEMINI_API_BASE_URL must start with 'http://' or 'https://'");
        }

        Ok(())
    }
}

impl OpenRouterConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let json_mode = parse_flag(lookup("OPENROUTER_JSON_MODE"), true)
            .context("OPENROUTER_JSON_MODE must be true or false")?;

        let timeout_secs = lookup("OPENROUTER_TIMEOUT_SECS")
            .unwrap_or_else(|| "60".to_string())
            .parse::<u64>()
            .context("OPENROUTER_TIMEOUT_SECS must be a valid number of seconds")?;

        Ok(OpenRouterConfig {
            api_key: non_empty(lookup("OPENROUTER_API_KEY")),
            model: non_empty(lookup("OPENROUTER_MODEL"))
                .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
            api_url: non_empty(lookup("OPENROUTER_API_URL"))
                .unwrap_or_else(|| DEFAULT_OPENROUTER_URL.to_string()),
            referer: non_empty(lookup("WEBHOOK_BASE_URL"))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            json_mode,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !is_http_url(&self.api_url) {
            anyhow::bail!("OPENROUTER_API_URL must start with 'http://' or 'https://'");
        }

        if self.timeout.as_secs() == 0 {
            anyhow::bail!("OPENROUTER_TIMEOUT_SECS must be greater than 0");
        }

        Ok(())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// One JSON object per line, for log collectors.
    Json,
    /// Human-readable lines for local development.
    Pretty,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value {
            "production" | "prod" => Environment::Production,
            _ => Environment::Local,
        }
    }

    pub fn log_format(&self) -> LogFormat {
        match self {
            Environment::Production => LogFormat::Json,
            Environment::Local => LogFormat::Pretty,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: Option<String>, default: bool) -> Result<bool> {
    match non_empty(value) {
        None => Ok(default),
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("invalid boolean value '{}'", other),
        },
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
