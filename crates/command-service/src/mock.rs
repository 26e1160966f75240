//! Scripted command provider for development and testing

use crate::extract::extract_action;
use crate::{CommandProvider, ProviderError};
use async_trait::async_trait;
use drum_intent::Action;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What the mock answers with
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Raw model output, run through the same extraction as a real reply
    Content(String),
    /// A fixed action
    Action(Action),
    /// Fail as if the HTTP call returned this status
    Status(u16),
}

/// Mock provider answering every command with the same scripted reply
pub struct MockProvider {
    name: String,
    reply: MockReply,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            name: "mock".to_string(),
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer with raw model output
    pub fn with_content(content: impl Into<String>) -> Self {
        Self::new(MockReply::Content(content.into()))
    }

    /// Set the provider id
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of commands seen so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandProvider for MockProvider {
    async fn interpret(&self, command: &str) -> Result<Action, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Mock provider interpreting {:?}", command);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            MockReply::Content(content) => extract_action(content),
            MockReply::Action(action) => Ok(action.clone()),
            MockReply::Status(status) => Err(ProviderError::Status(*status)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replies() {
        let provider = MockProvider::with_content(r#"{"action":"tap"}"#);
        assert_eq!(provider.interpret("tap").await.unwrap(), Action::Tap);

        let provider = MockProvider::new(MockReply::Status(503));
        assert!(matches!(
            provider.interpret("tap").await,
            Err(ProviderError::Status(503))
        ));
        assert_eq!(provider.calls(), 1);
    }
}
