use crate::ProviderError;
use async_trait::async_trait;
use drum_intent::Action;

/// A remote command interpreter consulted before the rule engine
#[async_trait]
pub trait CommandProvider: Send + Sync {
    /// Interpret one command into an action
    async fn interpret(&self, command: &str) -> Result<Action, ProviderError>;

    /// Identifier reported as the interpretation's provider
    fn name(&self) -> &str;
}
