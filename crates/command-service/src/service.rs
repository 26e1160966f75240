//! AI-first command interpretation with a deterministic fallback

use crate::{
    CommandProvider, Interpretation, ProviderError, Result, ServiceConfig, ServiceError,
};
use drum_intent::IntentEngine;
use std::sync::Arc;
use std::time::Duration;

/// Entry point for callers: validates the command, asks the provider (if any)
/// and falls back to the rule engine on any provider failure.
pub struct CommandService {
    provider: Option<Arc<dyn CommandProvider>>,
    engine: IntentEngine,
    timeout: Duration,
}

impl CommandService {
    /// Create a rules-only service
    pub fn new() -> Result<Self> {
        Ok(Self {
            provider: None,
            engine: IntentEngine::new()?,
            timeout: Duration::from_millis(ServiceConfig::default().timeout_ms),
        })
    }

    /// Create a service from configuration, building the provider it names
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let mut service = Self::new()?.with_timeout(Duration::from_millis(config.timeout_ms));
        if let Some(provider_config) = &config.provider {
            match crate::create_provider(provider_config.clone()) {
                Ok(provider) => service.set_provider(provider),
                Err(e) => tracing::warn!("Remote provider disabled: {}", e),
            }
        }
        Ok(service)
    }

    /// Set the provider consulted before the rule engine
    pub fn set_provider(&mut self, provider: Arc<dyn CommandProvider>) {
        self.provider = Some(provider);
    }

    pub fn with_provider(mut self, provider: Arc<dyn CommandProvider>) -> Self {
        self.set_provider(provider);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Interpret a command
    pub async fn interpret(&self, command: &str) -> Result<Interpretation> {
        if command.trim().is_empty() {
            return Err(ServiceError::EmptyCommand);
        }

        if let Some(provider) = &self.provider {
            match self.ask_provider(provider.as_ref(), command).await {
                Ok(action) => {
                    tracing::debug!(provider = provider.name(), %action, "provider answered");
                    return Ok(Interpretation::from_provider(action, provider.name()));
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        "Falling back to rule engine: {}",
                        e
                    );
                }
            }
        }

        Ok(Interpretation::from_rules(self.engine.classify(command)))
    }

    /// Interpret a request body of the form `{"command": "<text>"}`
    pub async fn interpret_json(&self, body: &serde_json::Value) -> Result<Interpretation> {
        let command = match body.get("command") {
            Some(serde_json::Value::String(command)) => command,
            Some(_) => return Err(ServiceError::InvalidCommand("command must be a string")),
            None => return Err(ServiceError::InvalidCommand("missing command")),
        };
        self.interpret(command).await
    }

    async fn ask_provider(
        &self,
        provider: &dyn CommandProvider,
        command: &str,
    ) -> Result<drum_intent::Action, ProviderError> {
        // Dropping the timed-out future abandons the request
        match tokio::time::timeout(self.timeout, provider.interpret(command)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockProvider, MockReply};
    use crate::{Confidence, RULES_PROVIDER};
    use drum_intent::{Action, Subdivision};

    #[tokio::test]
    async fn test_rules_only() {
        let service = CommandService::new().unwrap();

        let result = service.interpret("flip every four bars").await.unwrap();
        assert_eq!(result.action, Action::SchedulePageTurn { bars: 4 });
        assert_eq!(result.provider, RULES_PROVIDER);
        assert_eq!(result.confidence, Confidence::Medium);

        let result = service.interpret("asdkjasd").await.unwrap();
        assert_eq!(result.action, Action::unknown("asdkjasd"));
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[tokio::test]
    async fn test_provider_preempts_rules() {
        let provider = MockProvider::new(MockReply::Action(Action::SetSubdivision {
            subdivision: Subdivision::Triplet,
        }))
        .with_name("remote-model");
        let service = CommandService::new()
            .unwrap()
            .with_provider(Arc::new(provider));

        let result = service.interpret("swing it").await.unwrap();
        assert_eq!(
            result.action,
            Action::SetSubdivision {
                subdivision: Subdivision::Triplet
            }
        );
        assert_eq!(result.provider, "remote-model");
        assert_eq!(result.confidence, Confidence::High);
    }

    #[tokio::test]
    async fn test_provider_failures_fall_back() {
        let failing: Vec<MockProvider> = vec![
            MockProvider::new(MockReply::Status(500)),
            MockProvider::with_content("Sorry, I am not sure."),
            MockProvider::with_content(r#"{"action":"selfDestruct"}"#),
        ];

        for provider in failing {
            let provider = Arc::new(provider);
            let service = CommandService::new()
                .unwrap()
                .with_provider(provider.clone());

            let result = service.interpret("go to page three").await.unwrap();
            assert_eq!(result.action, Action::GoToPage { page: 3 });
            assert_eq!(result.provider, RULES_PROVIDER);
            assert_eq!(result.confidence, Confidence::Medium);
            assert_eq!(provider.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let provider = MockProvider::new(MockReply::Action(Action::Tap))
            .with_delay(Duration::from_millis(500));
        let service = CommandService::new()
            .unwrap()
            .with_provider(Arc::new(provider))
            .with_timeout(Duration::from_millis(20));

        let result = service.interpret("faster").await.unwrap();
        assert_eq!(result.action, Action::AdjustBpm { change: 5 });
        assert_eq!(result.provider, RULES_PROVIDER);
    }

    #[tokio::test]
    async fn test_empty_command_is_rejected() {
        let provider = Arc::new(MockProvider::new(MockReply::Action(Action::Tap)));
        let service = CommandService::new()
            .unwrap()
            .with_provider(provider.clone());

        assert!(matches!(
            service.interpret("   ").await,
            Err(ServiceError::EmptyCommand)
        ));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_json_boundary() {
        let service = CommandService::new().unwrap();

        let result = service
            .interpret_json(&serde_json::json!({"command": "next page"}))
            .await
            .unwrap();
        assert_eq!(result.action, Action::NextPage);

        for body in [
            serde_json::json!({}),
            serde_json::json!({"command": 42}),
            serde_json::json!({"command": null}),
            serde_json::json!("next page"),
        ] {
            assert!(matches!(
                service.interpret_json(&body).await,
                Err(ServiceError::InvalidCommand(_))
            ));
        }

        assert!(matches!(
            service
                .interpret_json(&serde_json::json!({"command": ""}))
                .await,
            Err(ServiceError::EmptyCommand)
        ));
    }

    #[tokio::test]
    async fn test_from_config_without_credentials_still_answers() {
        let config: ServiceConfig = serde_json::from_value(serde_json::json!({
            "provider": {
                "api_key_env": "DRUM_ASSIST_TEST_UNSET_KEY",
                "endpoint": "http://127.0.0.1:9/v1/chat/completions"
            },
            "timeout_ms": 1000
        }))
        .unwrap();
        let service = CommandService::from_config(&config).unwrap();

        let result = service.interpret("set tempo to 500").await.unwrap();
        assert_eq!(result.action, Action::SetBpm { bpm: 300 });
        assert_eq!(result.provider, RULES_PROVIDER);
    }
}
