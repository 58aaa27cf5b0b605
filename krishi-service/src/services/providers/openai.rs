//! OpenAI chat-completions provider.

use super::{ChatMessage, ChatProvider, GenerationParams, ProviderError};
use crate::config::OpenAiConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// OpenAI provider. Built once at startup from the immutable config.
pub struct OpenAiProvider {
    api_key: Option<Secret<String>>,
    base_url: String,
    model: String,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(config: &OpenAiConfig) -> Self {
        Self {
            api_key: config.credential().cloned(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client: Client::new(),
        }
    }

    /// Whether a usable credential was configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            ProviderError::NotConfigured("OpenAI API key not configured".to_string())
        })?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        tracing::debug!(
            model = %self.model,
            message_count = messages.len(),
            max_tokens = params.max_tokens,
            "Sending request to OpenAI API"
        );

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "OpenAI API error {}: {}",
                status, error_text
            )));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
