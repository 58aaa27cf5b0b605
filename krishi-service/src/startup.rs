//! Application startup and lifecycle management.

use crate::config::KrishiConfig;
use crate::handlers;
use crate::services::providers::openai::OpenAiProvider;
use crate::services::providers::{ChatProvider, GenerationParams};
use crate::services::{Advisor, LlmGateway};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::tracing::{request_id_middleware, REQUEST_ID_HEADER};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub advisor: Advisor,
}

impl AppState {
    /// Wire the advisor around an arbitrary provider.
    pub fn new(provider: Arc<dyn ChatProvider>, params: GenerationParams) -> Self {
        Self {
            advisor: Advisor::new(LlmGateway::new(provider, params)),
        }
    }

    /// State backed by the OpenAI provider described in `config`.
    pub fn from_config(config: &KrishiConfig) -> Self {
        let provider = OpenAiProvider::new(&config.openai);

        if provider.is_configured() {
            tracing::info!(
                model = %config.openai.model,
                base_url = %config.openai.base_url,
                "Initialized OpenAI provider"
            );
        } else {
            tracing::warn!("No valid OpenAI API key found, serving fallback responses only");
        }

        let params = GenerationParams {
            max_tokens: config.openai.max_tokens,
            temperature: config.openai.temperature,
        };

        Self::new(Arc::new(provider), params)
    }
}

/// Build the HTTP router. `max_upload_bytes` caps request bodies.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/ask", post(handlers::ask))
        .route("/chat", post(handlers::ask))
        .route("/analyze-image", post(handlers::analyze_image))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: KrishiConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config);
        let app = build_router(state, config.uploads.max_upload_bytes);

        let address = config.common.bind_address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
