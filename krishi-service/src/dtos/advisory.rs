use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Question {
    #[validate(custom(function = "not_blank"))]
    pub question: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Question cannot be empty".into());
        return Err(error);
    }
    Ok(())
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseSource {
    /// Generated by the language model.
    #[serde(rename = "OpenAI")]
    OpenAi,
    /// Canned fallback text.
    Database,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResponse {
    pub answer: String,
    pub source: ResponseSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAnalysisResponse {
    pub analysis: String,
    pub disease: String,
    pub treatment: String,
}
