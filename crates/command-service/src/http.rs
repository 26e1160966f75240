//! HTTP client for an OpenAI-compatible chat-completions endpoint.

use crate::extract::extract_action;
use crate::{CommandProvider, ProviderConfig, ProviderError};
use async_trait::async_trait;
use drum_intent::Action;

const SYSTEM_PROMPT: &str = r#"You turn a drummer's spoken command into exactly one JSON object.
Allowed objects:
{"action":"startMetronome"}
{"action":"stopMetronome"}
{"action":"setBpm","bpm":<integer 40-300>}
{"action":"adjustBpm","change":<signed integer>}
{"action":"setSubdivision","subdivision":"quarter"|"eighth"|"triplet"|"sixteenth"}
{"action":"nextPage"}
{"action":"previousPage"}
{"action":"goToPage","page":<integer>}
{"action":"schedulePageTurn","bars":<integer>}
{"action":"tap"}
{"action":"setTimer","ms":<milliseconds>,"start":<boolean>}
{"action":"startTimer"}
{"action":"resumeTimer"}
{"action":"pauseTimer"}
{"action":"cancelTimer"}
{"action":"timeLeft"}
{"action":"unknown","command":"<the original command>"}
Examples:
"flip every four bars" -> {"action":"schedulePageTurn","bars":4}
"set tempo to one hundred twenty" -> {"action":"setBpm","bpm":120}
"a bit faster" -> {"action":"adjustBpm","change":5}
"set a timer for 2 minutes and start it" -> {"action":"setTimer","ms":120000,"start":true}
"go to page three" -> {"action":"goToPage","page":3}
Respond with only the JSON object, no other text."#;

pub struct HttpCommandProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl HttpCommandProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        tracing::info!(
            "HttpCommandProvider: using endpoint {} ({})",
            config.endpoint,
            config.model
        );
        Ok(Self { config, client })
    }
}

#[async_trait]
impl CommandProvider for HttpCommandProvider {
    async fn interpret(&self, command: &str) -> Result<Action, ProviderError> {
        let api_key = self.config.resolve_api_key().ok_or_else(|| {
            ProviderError::MissingCredentials(format!("set {}", self.config.api_key_env))
        })?;

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": command},
            ],
            "temperature": 0.0,
        });

        let start = std::time::Instant::now();
        let resp = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status().as_u16()));
        }

        // Expected response: { choices: [{ message: { content } }] }
        #[derive(serde::Deserialize)]
        struct Message {
            content: Option<String>,
        }
        #[derive(serde::Deserialize)]
        struct Choice {
            message: Message,
        }
        #[derive(serde::Deserialize)]
        struct RespBody {
            choices: Vec<Choice>,
        }

        let body: RespBody = resp
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("empty choices".to_string()))?;

        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "provider replied: {}",
            content
        );
        extract_action(&content)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}
