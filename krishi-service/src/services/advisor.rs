//! Question and image orchestration: model first, canned text second.

use super::fallback::fallback_answer;
use super::gateway::{Completion, LlmGateway};
use super::providers::ChatMessage;
use crate::dtos::{ImageAnalysisResponse, ResponseSource, TextResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const ADVISOR_SYSTEM_PROMPT: &str =
    "You are an expert agricultural advisor. Provide practical farming advice.";
const IMAGE_SYSTEM_PROMPT: &str = "Analyze crop images for diseases and suggest treatment.";
const IMAGE_USER_PROMPT: &str = "Analyze this crop for diseases and treatment.";

pub const CLEAR_IMAGE_PROMPT: &str = "Upload a clear image of the affected crop area for analysis.";
pub const ANALYSIS_STATUS: &str = "Complete";
pub const TREATMENT_NOTE: &str = "See analysis";

/// Image types the model accepts as inline data.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

pub fn is_allowed_image_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

#[derive(Clone)]
pub struct Advisor {
    gateway: LlmGateway,
}

impl Advisor {
    pub fn new(gateway: LlmGateway) -> Self {
        Self { gateway }
    }

    /// Answer a farming question. Never fails: an unreachable model yields
    /// keyword-matched advice tagged [`ResponseSource::Database`].
    pub async fn answer(&self, question: &str) -> TextResponse {
        let messages = [
            ChatMessage::system(ADVISOR_SYSTEM_PROMPT),
            ChatMessage::user(question),
        ];

        match self.gateway.complete(&messages, None).await {
            Completion::Generated(answer) => TextResponse {
                answer,
                source: ResponseSource::OpenAi,
            },
            Completion::Unavailable => TextResponse {
                answer: fallback_answer(question).to_string(),
                source: ResponseSource::Database,
            },
        }
    }

    /// Analyze an already-validated crop image.
    pub async fn analyze_image(&self, content_type: &str, bytes: &[u8]) -> ImageAnalysisResponse {
        let encoded = STANDARD.encode(bytes);
        let messages = [
            ChatMessage::system(IMAGE_SYSTEM_PROMPT),
            ChatMessage::user_with_image(IMAGE_USER_PROMPT, content_type, &encoded),
        ];

        let analysis = match self.gateway.complete(&messages, None).await {
            Completion::Generated(text) => text,
            Completion::Unavailable => CLEAR_IMAGE_PROMPT.to_string(),
        };

        ImageAnalysisResponse {
            analysis,
            disease: ANALYSIS_STATUS.to_string(),
            treatment: TREATMENT_NOTE.to_string(),
        }
    }
}
