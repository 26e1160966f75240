//! command-service: interpret drummer commands
//!
//! A remote AI provider is consulted first; when it is missing, slow, failing
//! or answers with something that is not a known action, the deterministic
//! rule engine from `drum-intent` answers instead. Callers always get an
//! [`Interpretation`] with the provider that produced it and a confidence.

mod error;
pub use error::{ProviderError, Result, ServiceError};

mod types;
pub use types::{Confidence, Interpretation, ProviderConfig, ServiceConfig, RULES_PROVIDER};

mod traits;
pub use traits::CommandProvider;

mod extract;
pub use extract::extract_action;

mod service;
pub use service::CommandService;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "http")]
pub mod http;

pub use drum_intent::{Action, Subdivision};

use std::sync::Arc;

/// Initialize the command service system
pub fn init() -> Result<()> {
    tracing::info!("Initializing command service");
    drum_intent::init().map_err(|e| ServiceError::EngineUnavailable(e.to_string()))
}

/// Create a provider instance based on configuration
pub fn create_provider(
    config: ProviderConfig,
) -> Result<Arc<dyn CommandProvider>, ProviderError> {
    match config.kind.as_str() {
        #[cfg(feature = "mock")]
        "mock" => {
            let reply = config.mock_reply.clone().unwrap_or_default();
            Ok(Arc::new(mock::MockProvider::with_content(reply)))
        }
        #[cfg(feature = "http")]
        "http" => {
            let provider = http::HttpCommandProvider::new(config)?;
            Ok(Arc::new(provider))
        }
        other => Err(ProviderError::Unsupported(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider() {
        let config = ProviderConfig {
            kind: "mock".to_string(),
            mock_reply: Some(r#"{"action":"nextPage"}"#.to_string()),
            ..ProviderConfig::default()
        };
        let provider = create_provider(config).unwrap();
        assert_eq!(provider.name(), "mock");

        let config = ProviderConfig {
            kind: "carrier-pigeon".to_string(),
            ..ProviderConfig::default()
        };
        assert!(matches!(
            create_provider(config),
            Err(ProviderError::Unsupported(_))
        ));
    }

    #[test]
    fn test_init() {
        assert!(init().is_ok());
    }
}
