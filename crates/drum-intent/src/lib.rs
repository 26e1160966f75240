//! Intent parser for drummer voice commands
//!
//! This crate turns short spoken or typed phrases ("flip every four bars",
//! "set tempo to one hundred twenty") into one [`Action`] from a fixed
//! vocabulary. It works offline and never fails: anything it cannot place
//! becomes [`Action::Unknown`].

mod actions;
mod duration;
mod error;
mod normalize;
mod numbers;
mod parser;

pub use actions::{clamp_bpm, Action, Subdivision, DEFAULT_TEMPO_STEP, MAX_BPM, MIN_BPM};
pub use duration::resolve_duration_ms;
pub use error::{IntentError, Result};
pub use normalize::normalize;
pub use numbers::{leading_number, resolve_number};
pub use parser::{IntentEngine, ParseResult, RuleId, RULE_ORDER};

use std::sync::OnceLock;

static ENGINE: OnceLock<Result<IntentEngine>> = OnceLock::new();

/// Initialize the shared intent engine
pub fn init() -> Result<(), &'static IntentError> {
    tracing::info!("Initializing intent engine");
    shared_engine().map(|_| ())
}

/// Create a standalone intent engine
pub fn create_engine() -> Result<IntentEngine> {
    IntentEngine::new()
}

/// The process-wide engine, compiled on first use
pub fn shared_engine() -> Result<&'static IntentEngine, &'static IntentError> {
    ENGINE.get_or_init(IntentEngine::new).as_ref()
}

/// Classify a command with the shared engine.
///
/// Total: if the rule patterns could not be compiled the error is logged and
/// the command comes back as [`Action::Unknown`].
pub fn classify(text: &str) -> Action {
    match shared_engine() {
        Ok(engine) => engine.classify(text),
        Err(e) => {
            tracing::error!("intent engine unavailable: {}", e);
            Action::unknown(text)
        }
    }
}
