//! Interactive text loop with optional wake-word gating

use anyhow::Result;
use command_service::CommandService;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "Try: start, stop the metronome, set tempo to 120, faster by ten, \
eighth notes, next page, go to page 5, flip every four bars, tap, \
set a timer for 2 minutes, cancel timer, quit.";

/// What a line of input means once the wake word is taken into account
#[derive(Debug, PartialEq, Eq)]
pub enum Gate {
    /// Wake word heard on its own; the next line is the command
    Armed,
    /// A command to interpret
    Command(String),
    /// Not addressed to the assistant
    Ignored,
}

/// Tracks whether the assistant has been addressed
pub struct WakeGate {
    wake_word: Option<String>,
    armed: bool,
}

impl WakeGate {
    pub fn new(wake_word: Option<&str>) -> Self {
        Self {
            wake_word: wake_word
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty()),
            armed: false,
        }
    }

    pub fn feed(&mut self, line: &str) -> Gate {
        let line = line.trim();
        let Some(wake_word) = &self.wake_word else {
            return Gate::Command(line.to_string());
        };

        let mut parts = line.splitn(2, char::is_whitespace);
        let first = parts.next().unwrap_or_default();
        let addressed = first
            .trim_matches(|c: char| !c.is_alphanumeric())
            .eq_ignore_ascii_case(wake_word);

        if addressed {
            let rest = parts
                .next()
                .unwrap_or_default()
                .trim_start_matches(|c: char| c == ',' || c.is_whitespace());
            if rest.is_empty() {
                self.armed = true;
                return Gate::Armed;
            }
            self.armed = false;
            return Gate::Command(rest.to_string());
        }

        if self.armed {
            self.armed = false;
            Gate::Command(line.to_string())
        } else {
            Gate::Ignored
        }
    }
}

/// Read commands from `input` until EOF or `quit`, writing one JSON
/// interpretation per command to `output`.
pub async fn run<R: AsyncBufRead + Unpin, W: Write>(
    service: &CommandService,
    wake_word: Option<&str>,
    input: R,
    mut output: W,
) -> Result<()> {
    let mut gate = WakeGate::new(wake_word);

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match trimmed.to_lowercase().as_str() {
            "quit" | "exit" => break,
            "help" => {
                writeln!(output, "{}", HELP)?;
                continue;
            }
            _ => {}
        }

        let command = match gate.feed(trimmed) {
            Gate::Command(command) => command,
            Gate::Armed => {
                tracing::info!("Wake word heard, listening");
                continue;
            }
            Gate::Ignored => {
                tracing::debug!("Ignoring {:?} (wake word not heard)", trimmed);
                continue;
            }
        };

        let interpretation = service.interpret(&command).await?;
        writeln!(output, "{}", serde_json::to_string(&interpretation)?)?;
    }

    Ok(())
}
