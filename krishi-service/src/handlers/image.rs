use axum::{
    extract::{multipart::{MultipartError, MultipartRejection}, Multipart, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::ImageAnalysisResponse;
use crate::services::advisor::is_allowed_image_type;
use crate::startup::AppState;

/// Multipart field that carries the crop photo.
const FILE_FIELD: &str = "file";

#[tracing::instrument(skip(state, payload))]
pub async fn analyze_image(
    State(state): State<AppState>,
    payload: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImageAnalysisResponse>, AppError> {
    let mut multipart = payload
        .map_err(|rejection| AppError::BadRequest(anyhow::anyhow!(rejection.body_text())))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, AppError::BadRequest))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_allowed_image_type(&content_type) {
            tracing::info!(content_type = %content_type, "Rejected upload with unsupported type");
            return Err(AppError::BadRequest(anyhow::anyhow!("Invalid image type")));
        }

        let file_name = field.file_name().unwrap_or("unnamed").to_string();

        let data = field.bytes().await.map_err(|e| {
            tracing::error!(file_name = %file_name, error = %e, "Failed to read uploaded image");
            multipart_error(e, AppError::InternalError)
        })?;

        tracing::info!(file_name = %file_name, size = data.len(), "Analyzing image");

        let response = state.advisor.analyze_image(&content_type, &data).await;
        return Ok(Json(response));
    }

    Err(AppError::BadRequest(anyhow::anyhow!("No file uploaded")))
}

/// Body-limit breaches become 413; everything else goes to `otherwise`.
fn multipart_error(e: MultipartError, otherwise: fn(anyhow::Error) -> AppError) -> AppError {
    let message = anyhow::anyhow!("Error: {}", e.body_text());
    match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(message),
        _ => otherwise(message),
    }
}
