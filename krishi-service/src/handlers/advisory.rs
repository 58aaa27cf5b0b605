use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use service_core::error::AppError;
use validator::Validate;

use crate::dtos::{Question, TextResponse};
use crate::startup::AppState;

/// Serves both `/ask` and `/chat`.
#[tracing::instrument(skip(state, payload))]
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<Question>, JsonRejection>,
) -> Result<Json<TextResponse>, AppError> {
    let Json(request) =
        payload.map_err(|rejection| AppError::BadRequest(anyhow::anyhow!(rejection.body_text())))?;
    request.validate()?;

    tracing::info!(question = %request.question, "Processing question");

    let response = state.advisor.answer(&request.question).await;

    tracing::info!(source = ?response.source, "Question answered");

    Ok(Json(response))
}
