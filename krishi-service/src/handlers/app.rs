use axum::{response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "🌾 KrishiSahay - AI Farming Assistant",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "KrishiSahay API"
    }))
}

pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Not found"))
}
