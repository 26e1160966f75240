//! Drummer action definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest tempo the metronome accepts
pub const MIN_BPM: u32 = 40;
/// Highest tempo the metronome accepts
pub const MAX_BPM: u32 = 300;
/// Tempo change applied when a relative command carries no magnitude
pub const DEFAULT_TEMPO_STEP: i32 = 5;

/// An action the assistant can perform in response to a command.
///
/// Serialized as an internally tagged object, e.g.
/// `{"action":"setBpm","bpm":120}`. Remote providers answer in the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    /// Start the click
    StartMetronome,
    /// Stop the click
    StopMetronome,
    /// Set an absolute tempo
    SetBpm { bpm: u32 },
    /// Change the tempo relative to the current one
    AdjustBpm { change: i32 },
    /// Change the audible subdivision
    SetSubdivision { subdivision: Subdivision },
    /// Show the next page of the chart
    NextPage,
    /// Show the previous page of the chart
    PreviousPage,
    /// Jump to a page (1-based)
    GoToPage { page: u32 },
    /// Turn the page automatically every `bars` bars
    SchedulePageTurn { bars: u32 },
    /// Register a tap for tap tempo
    Tap,
    /// Set a countdown timer, optionally starting it right away
    SetTimer { ms: u64, start: bool },
    StartTimer,
    ResumeTimer,
    PauseTimer,
    CancelTimer,
    /// Report how much time is left on the timer
    TimeLeft,
    /// Nothing matched; carries the original command text
    Unknown { command: String },
}

impl Action {
    /// The wire tag of this action (`setBpm`, `nextPage`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            Action::StartMetronome => "startMetronome",
            Action::StopMetronome => "stopMetronome",
            Action::SetBpm { .. } => "setBpm",
            Action::AdjustBpm { .. } => "adjustBpm",
            Action::SetSubdivision { .. } => "setSubdivision",
            Action::NextPage => "nextPage",
            Action::PreviousPage => "previousPage",
            Action::GoToPage { .. } => "goToPage",
            Action::SchedulePageTurn { .. } => "schedulePageTurn",
            Action::Tap => "tap",
            Action::SetTimer { .. } => "setTimer",
            Action::StartTimer => "startTimer",
            Action::ResumeTimer => "resumeTimer",
            Action::PauseTimer => "pauseTimer",
            Action::CancelTimer => "cancelTimer",
            Action::TimeLeft => "timeLeft",
            Action::Unknown { .. } => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Action::Unknown { .. })
    }

    /// Create an unknown action preserving the command as received
    pub fn unknown(command: impl Into<String>) -> Self {
        Action::Unknown {
            command: command.into(),
        }
    }

    /// Create a tempo action, clamping into the metronome range
    pub fn set_bpm(value: u64) -> Self {
        Action::SetBpm {
            bpm: clamp_bpm(value),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::SetBpm { bpm } => write!(f, "{} {}", self.name(), bpm),
            Action::AdjustBpm { change } => write!(f, "{} {:+}", self.name(), change),
            Action::SetSubdivision { subdivision } => write!(f, "{} {}", self.name(), subdivision),
            Action::GoToPage { page } => write!(f, "{} {}", self.name(), page),
            Action::SchedulePageTurn { bars } => write!(f, "{} every {} bars", self.name(), bars),
            Action::SetTimer { ms, start } => {
                write!(f, "{} {}ms", self.name(), ms)?;
                if *start {
                    write!(f, " (start)")?;
                }
                Ok(())
            }
            Action::Unknown { command } => write!(f, "{} {:?}", self.name(), command),
            _ => f.write_str(self.name()),
        }
    }
}

/// Rhythmic subdivision of the beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subdivision {
    Quarter,
    Eighth,
    Triplet,
    Sixteenth,
}

impl Subdivision {
    /// Number of clicks per beat
    pub fn pulses_per_beat(&self) -> u32 {
        match self {
            Subdivision::Quarter => 1,
            Subdivision::Eighth => 2,
            Subdivision::Triplet => 3,
            Subdivision::Sixteenth => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Subdivision::Quarter => "quarter",
            Subdivision::Eighth => "eighth",
            Subdivision::Triplet => "triplet",
            Subdivision::Sixteenth => "sixteenth",
        }
    }
}

impl fmt::Display for Subdivision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp a resolved tempo into `[MIN_BPM, MAX_BPM]`
pub fn clamp_bpm(value: u64) -> u32 {
    // Values beyond u32 saturate before clamping
    let value = u32::try_from(value).unwrap_or(u32::MAX);
    value.clamp(MIN_BPM, MAX_BPM)
}
