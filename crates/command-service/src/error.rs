use thiserror::Error;

pub type Result<T, E = ServiceError> = core::result::Result<T, E>;

/// Failures of a remote command provider. The service recovers from all of
/// them by falling back to the rule engine.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("missing credentials: {0}")]
    MissingCredentials(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider returned HTTP {0}")]
    Status(u16),
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("provider timed out after {0} ms")]
    Timeout(u64),
    #[error("unsupported provider: {0}")]
    Unsupported(String),
}

/// Errors reported to the caller of the service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("command must not be empty")]
    EmptyCommand,
    #[error("invalid command: {0}")]
    InvalidCommand(&'static str),
    #[error("intent engine failed to compile: {0}")]
    Engine(#[from] drum_intent::IntentError),
    #[error("intent engine unavailable: {0}")]
    EngineUnavailable(String),
}
