use drum_intent::Action;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider id reported when the rule engine produced the action
pub const RULES_PROVIDER: &str = "rules";

/// How much the caller can trust an interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Produced by the remote provider
    High,
    /// The rule engine matched a known action
    Medium,
    /// The rule engine fell back to `unknown`
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        f.write_str(s)
    }
}

/// An action plus where it came from.
///
/// Serializes flat: `{"action":"setBpm","bpm":120,"provider":"rules","confidence":"medium"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    #[serde(flatten)]
    pub action: Action,
    pub provider: String,
    pub confidence: Confidence,
}

impl Interpretation {
    /// Wrap an action produced by the rule engine
    pub fn from_rules(action: Action) -> Self {
        let confidence = if action.is_unknown() {
            Confidence::Low
        } else {
            Confidence::Medium
        };
        Self {
            action,
            provider: RULES_PROVIDER.to_string(),
            confidence,
        }
    }

    /// Wrap an action produced by a remote provider
    pub fn from_provider(action: Action, provider: impl Into<String>) -> Self {
        Self {
            action,
            provider: provider.into(),
            confidence: Confidence::High,
        }
    }
}

/// Remote provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider kind: `http` (chat completions) or `mock`
    pub kind: String,
    /// Chat-completions endpoint
    pub endpoint: String,
    /// Model name sent with each request
    pub model: String,
    /// API key; when absent it is read from `api_key_env`
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Scripted reply for the `mock` kind
    pub mock_reply: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: "http".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            mock_reply: None,
        }
    }
}

impl ProviderConfig {
    /// Resolve the API key from the config or the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Command service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Remote provider consulted before the rule engine
    pub provider: Option<ProviderConfig>,
    /// How long to wait for the provider before falling back
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            provider: None,
            timeout_ms: 4000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpretation_is_flat() {
        let interpretation = Interpretation::from_rules(Action::SetBpm { bpm: 120 });
        let json = serde_json::to_value(&interpretation).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "action": "setBpm",
                "bpm": 120,
                "provider": "rules",
                "confidence": "medium"
            })
        );
    }

    #[test]
    fn test_rules_confidence() {
        assert_eq!(
            Interpretation::from_rules(Action::NextPage).confidence,
            Confidence::Medium
        );
        assert_eq!(
            Interpretation::from_rules(Action::unknown("hmm")).confidence,
            Confidence::Low
        );
        assert_eq!(
            Interpretation::from_provider(Action::NextPage, "gpt-4o-mini").confidence,
            Confidence::High
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: ServiceConfig = serde_json::from_str("{}").unwrap();
        assert!(config.provider.is_none());
        assert_eq!(config.timeout_ms, 4000);

        let config: ServiceConfig =
            serde_json::from_str(r#"{"provider": {"model": "local"}}"#).unwrap();
        let provider = config.provider.unwrap();
        assert_eq!(provider.model, "local");
        assert_eq!(provider.kind, "http");
        assert_eq!(provider.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = ProviderConfig {
            api_key: Some("sk-test".to_string()),
            api_key_env: "DRUM_ASSIST_TEST_UNSET_KEY".to_string(),
            ..ProviderConfig::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-test"));

        let config = ProviderConfig {
            api_key: Some("   ".to_string()),
            api_key_env: "DRUM_ASSIST_TEST_UNSET_KEY".to_string(),
            ..ProviderConfig::default()
        };
        assert_eq!(config.resolve_api_key(), None);
    }
}
