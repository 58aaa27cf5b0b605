#![allow(dead_code)]

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, Request, StatusCode},
    routing::post,
    Json, Router,
};
use http_body_util::BodyExt;
use krishi_service::config::{KrishiConfig, OpenAiConfig, UploadConfig};
use krishi_service::services::providers::mock::MockChatProvider;
use krishi_service::services::providers::GenerationParams;
use krishi_service::startup::{build_router, AppState};
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_UPLOAD_LIMIT: usize = 1024 * 1024;
const BOUNDARY: &str = "krishi-test-boundary";

/// Router wired to a scripted provider.
pub fn mock_app(provider: Arc<MockChatProvider>) -> Router {
    build_router(
        AppState::new(provider, GenerationParams::default()),
        TEST_UPLOAD_LIMIT,
    )
}

/// Router wired to the real OpenAI client, talking to `base_url`.
pub fn openai_app(api_key: Option<&str>, base_url: &str) -> Router {
    let config = test_config(api_key, base_url);
    build_router(AppState::from_config(&config), config.uploads.max_upload_bytes)
}

pub fn test_config(api_key: Option<&str>, base_url: &str) -> KrishiConfig {
    KrishiConfig {
        common: service_core::config::Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: "debug".to_string(),
        },
        openai: OpenAiConfig {
            api_key: api_key.map(|k| Secret::new(k.to_string())),
            base_url: base_url.to_string(),
            ..Default::default()
        },
        uploads: UploadConfig {
            max_upload_bytes: TEST_UPLOAD_LIMIT,
        },
        otlp_endpoint: None,
    }
}

pub fn question_request(path: &str, question: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "question": question }).to_string()))
        .unwrap()
}

pub fn get_request(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

/// A `multipart/form-data` upload with a single file field.
pub fn upload_request(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = part_head(field, file_name, content_type);
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    multipart_request(body)
}

/// A file part whose stream ends before the closing boundary.
pub fn truncated_upload_request(file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = part_head("file", file_name, content_type);
    body.extend_from_slice(data);
    multipart_request(body)
}

fn part_head(field: &str, file_name: &str, content_type: &str) -> Vec<u8> {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes()
}

fn multipart_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/analyze-image")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Stand-in for the chat-completions API. Counts hits and keeps the last
/// request body and authorization header.
#[derive(Clone, Default)]
pub struct FakeOpenAi {
    hits: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<Value>>>,
    last_auth: Arc<Mutex<Option<String>>>,
    reply: Arc<Mutex<Option<(StatusCode, Value)>>>,
}

impl FakeOpenAi {
    pub fn answering(text: &str) -> Self {
        let fake = Self::default();
        *fake.reply.lock().unwrap() = Some((
            StatusCode::OK,
            json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": text },
                    "finish_reason": "stop"
                }]
            }),
        ));
        fake
    }

    pub fn failing(status: StatusCode) -> Self {
        let fake = Self::default();
        *fake.reply.lock().unwrap() =
            Some((status, json!({ "error": { "message": "quota exceeded" } })));
        fake
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<Value> {
        self.last_body.lock().unwrap().clone()
    }

    pub fn last_auth(&self) -> Option<String> {
        self.last_auth.lock().unwrap().clone()
    }

    /// Serve on a random local port; returns the API base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/v1/chat/completions", post(fake_completions))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/v1", addr)
    }
}

async fn fake_completions(
    State(fake): State<FakeOpenAi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    fake.hits.fetch_add(1, Ordering::SeqCst);
    *fake.last_body.lock().unwrap() = Some(body);
    *fake.last_auth.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let (status, reply) = fake
        .reply
        .lock()
        .unwrap()
        .clone()
        .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, json!({})));
    (status, Json(reply))
}

/// An address nothing listens on.
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:1/v1";
