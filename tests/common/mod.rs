#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use inwen_webhook::{
    config::Config, create_router, prompt::PromptStyle, AppState, Explainer, ProviderError,
};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tower::util::ServiceExt;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const VALID_LOOKUP: &str = r#"{"word":"serendipity","context":"Finding that book was pure serendipity.","source":"https://example.com/post","language":"en-US","timestamp":"2025-01-15T10:30:00.000Z"}"#;

/// What a [`StaticExplainer`] answers with.
#[derive(Clone)]
pub enum Reply {
    Text(String),
    UpstreamStatus(u16),
    /// Answers only after the given delay.
    Hang(Duration),
}

/// In-process explainer that records the prompts it receives.
pub struct StaticExplainer {
    name: &'static str,
    style: PromptStyle,
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl StaticExplainer {
    pub fn new(name: &'static str, style: PromptStyle, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            name,
            style,
            reply,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Explainer for StaticExplainer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn model(&self) -> &str {
        "static"
    }

    fn prompt_style(&self) -> PromptStyle {
        self.style
    }

    async fn explain(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::UpstreamStatus(status) => Err(ProviderError::UpstreamStatus {
                status: *status,
                body: "stub failure".to_string(),
            }),
            Reply::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("too late".to_string())
            }
        }
    }
}

/// Router backed by two static explainers.
pub fn mock_router(gemini: Arc<StaticExplainer>, openrouter: Arc<StaticExplainer>) -> Router {
    create_router(AppState::new(gemini, openrouter), TEST_TIMEOUT)
}

/// Router with explicit provider-call and whole-request deadlines.
pub fn mock_router_with_timeouts(
    gemini: Arc<StaticExplainer>,
    openrouter: Arc<StaticExplainer>,
    upstream_timeout: Duration,
    request_timeout: Duration,
) -> Router {
    let state = AppState::new(gemini, openrouter).with_upstream_timeout(upstream_timeout);
    create_router(state, request_timeout)
}

/// Router backed by the real provider clients, configured from `vars`.
pub fn provider_router(vars: &[(&str, &str)]) -> Router {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = tokio_test::assert_ok!(Config::from_map(&vars));
    let state = tokio_test::assert_ok!(AppState::from_config(&config));

    create_router(state, TEST_TIMEOUT)
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send one request and return status plus body text.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// A request as seen by the stub upstream.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    content_type: &'static str,
    body: &'static str,
    hits: Arc<AtomicUsize>,
    captured: Arc<Mutex<Option<CapturedRequest>>>,
}

/// Local HTTP server standing in for a provider API.
pub struct StubUpstream {
    pub url: String,
    hits: Arc<AtomicUsize>,
    captured: Arc<Mutex<Option<CapturedRequest>>>,
}

impl StubUpstream {
    pub async fn json(status: StatusCode, body: &'static str) -> Self {
        Self::spawn(status, "application/json", body).await
    }

    pub async fn spawn(status: StatusCode, content_type: &'static str, body: &'static str) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let captured = Arc::new(Mutex::new(None));
        let state = StubState {
            status,
            content_type,
            body,
            hits: hits.clone(),
            captured: captured.clone(),
        };

        let app = Router::new().fallback(respond).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            hits,
            captured,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> CapturedRequest {
        self.captured
            .lock()
            .unwrap()
            .clone()
            .expect("stub upstream received no request")
    }
}

async fn respond(State(stub): State<StubState>, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    *stub.captured.lock().unwrap() = Some(CapturedRequest {
        path: uri.path().to_string(),
        headers,
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });

    (stub.status, [(header::CONTENT_TYPE, stub.content_type)], stub.body).into_response()
}
