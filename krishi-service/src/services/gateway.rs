//! LLM gateway: the only place provider errors are seen.
//!
//! Every failure (missing key, network, HTTP status, bad body) collapses into
//! [`Completion::Unavailable`], so callers have exactly two cases to handle.

use super::providers::{ChatMessage, ChatProvider, GenerationParams, ProviderError};
use std::sync::Arc;

/// Outcome of a single gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Generated(String),
    Unavailable,
}

#[derive(Clone)]
pub struct LlmGateway {
    provider: Arc<dyn ChatProvider>,
    params: GenerationParams,
}

impl LlmGateway {
    pub fn new(provider: Arc<dyn ChatProvider>, params: GenerationParams) -> Self {
        Self { provider, params }
    }

    /// Run one completion. `max_tokens` overrides the configured budget.
    pub async fn complete(&self, messages: &[ChatMessage], max_tokens: Option<u32>) -> Completion {
        let params = GenerationParams {
            max_tokens: max_tokens.unwrap_or(self.params.max_tokens),
            ..self.params
        };

        match self.provider.complete(messages, &params).await {
            Ok(text) => Completion::Generated(text),
            Err(ProviderError::NotConfigured(reason)) => {
                tracing::debug!(provider = self.provider.name(), %reason, "Skipping LLM call");
                Completion::Unavailable
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "LLM call failed, using fallback"
                );
                Completion::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockChatProvider;

    #[tokio::test]
    async fn generated_text_passes_through() {
        let gateway = LlmGateway::new(
            Arc::new(MockChatProvider::answering("Plant in rows.")),
            GenerationParams::default(),
        );
        let completion = gateway.complete(&[ChatMessage::user("how?")], None).await;
        assert_eq!(completion, Completion::Generated("Plant in rows.".to_string()));
    }

    #[tokio::test]
    async fn provider_error_becomes_unavailable() {
        let provider = Arc::new(MockChatProvider::failing());
        let gateway = LlmGateway::new(provider.clone(), GenerationParams::default());

        let completion = gateway.complete(&[ChatMessage::user("how?")], Some(50)).await;

        assert_eq!(completion, Completion::Unavailable);
        assert_eq!(provider.calls(), 1);
    }
}
