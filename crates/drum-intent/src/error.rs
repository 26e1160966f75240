use thiserror::Error;

pub type Result<T, E = IntentError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum IntentError {
    #[error("invalid rule pattern {rule}: {source}")]
    Pattern {
        rule: &'static str,
        #[source]
        source: regex::Error,
    },
}
