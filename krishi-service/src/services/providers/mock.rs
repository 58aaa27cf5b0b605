//! Mock provider for tests.

use super::{ChatMessage, ChatProvider, GenerationParams, ProviderError};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted provider: either always answers with fixed text or always fails.
/// Records how often it was called and the last conversation it saw.
pub struct MockChatProvider {
    reply: Option<String>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<ChatMessage>>,
}

impl MockChatProvider {
    pub fn answering(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_messages.lock() {
            *last = messages.to_vec();
        }

        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(ProviderError::NetworkError(
                "mock provider is offline".to_string(),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
