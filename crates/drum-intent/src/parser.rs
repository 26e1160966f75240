//! Rule engine for drummer voice commands
//!
//! Rules are evaluated in a fixed order and the first one that produces an
//! action wins. Categories overlap on purpose ("cancel timer" is both a timer
//! and a stop phrase), so the order in [`RULE_ORDER`] is part of the contract.

use crate::actions::{clamp_bpm, Action, Subdivision, DEFAULT_TEMPO_STEP};
use crate::duration::{clock_ms, resolve_duration_ms};
use crate::error::{IntentError, Result};
use crate::normalize::normalize;
use crate::numbers::{leading_number, resolve_number};
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Identifies the rule that produced an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    Timer,
    MetronomeStart,
    MetronomeStop,
    ExplicitBpm,
    BareBpm,
    TempoStep,
    TempoNudge,
    Subdivision,
    RelativePage,
    AbsolutePage,
    ScheduledPageTurn,
    Tap,
    /// No rule matched
    Fallback,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::Timer => "timer",
            RuleId::MetronomeStart => "metronome_start",
            RuleId::MetronomeStop => "metronome_stop",
            RuleId::ExplicitBpm => "explicit_bpm",
            RuleId::BareBpm => "bare_bpm",
            RuleId::TempoStep => "tempo_step",
            RuleId::TempoNudge => "tempo_nudge",
            RuleId::Subdivision => "subdivision",
            RuleId::RelativePage => "relative_page",
            RuleId::AbsolutePage => "absolute_page",
            RuleId::ScheduledPageTurn => "scheduled_page_turn",
            RuleId::Tap => "tap",
            RuleId::Fallback => "fallback",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluation order of the rule battery
pub const RULE_ORDER: [RuleId; 12] = [
    RuleId::Timer,
    RuleId::MetronomeStart,
    RuleId::MetronomeStop,
    RuleId::ExplicitBpm,
    RuleId::BareBpm,
    RuleId::TempoStep,
    RuleId::TempoNudge,
    RuleId::Subdivision,
    RuleId::RelativePage,
    RuleId::AbsolutePage,
    RuleId::ScheduledPageTurn,
    RuleId::Tap,
];

/// Result of parsing a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// The parsed action
    pub action: Action,
    /// Rule that produced it
    pub rule: RuleId,
    /// Normalized text the rules were tested against
    pub normalized: String,
}

/// The views of one command that rules test against
struct Utterance<'a> {
    /// Exactly as received
    raw: &'a str,
    /// Lower-cased and trimmed, punctuation intact (for `2:30`, `8th`)
    lowered: String,
    /// Output of [`normalize`]
    text: String,
}

impl<'a> Utterance<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lowered: raw.trim().to_lowercase(),
            text: normalize(raw),
        }
    }
}

/// Compiled rule patterns
struct Patterns {
    timer_topic: Regex,
    timer_set: Regex,
    timer_start: Regex,
    timer_resume: Regex,
    timer_pause: Regex,
    timer_cancel: Regex,
    timer_left: Regex,
    metronome_start: Regex,
    metronome_stop: Regex,
    bpm_keyword: Regex,
    bpm_suffix: Regex,
    bare_bpm: Regex,
    tempo_up: Regex,
    tempo_down: Regex,
    nudge_up: Regex,
    nudge_down: Regex,
    eighth: Regex,
    eighth_ordinal: Regex,
    sixteenth: Regex,
    sixteenth_ordinal: Regex,
    quarter: Regex,
    triplet: Regex,
    next_page: Regex,
    previous_page: Regex,
    goto_page: Regex,
    page_turn: Regex,
    tap: Regex,
}

fn pattern(rule: &'static str, source: &str) -> Result<Regex> {
    Regex::new(source).map_err(|source| IntentError::Pattern { rule, source })
}

impl Patterns {
    fn compile() -> Result<Self> {
        Ok(Self {
            timer_topic: pattern("timer_topic", r"\b(?:timer|countdown)\b")?,
            timer_set: pattern(
                "timer_set",
                r"\b(?:set|start|make|begin)\s+(?:(?:a|an|the)\s+)?(?:timer|countdown)\s+(?:for\s+)?(.+)$",
            )?,
            timer_start: pattern("timer_start", r"\b(?:start|begin|go|kick\s?off)\b")?,
            timer_resume: pattern("timer_resume", r"\b(?:resume|continue)\b")?,
            timer_pause: pattern("timer_pause", r"\b(?:pause|hold)\b")?,
            timer_cancel: pattern("timer_cancel", r"\b(?:cancel|stop|clear)\b")?,
            timer_left: pattern(
                "timer_left",
                r"\btime left\b|\bhow much time is left\b",
            )?,
            metronome_start: pattern(
                "metronome_start",
                r"\b(?:start|play|begin)\b.*\b(?:metronome|click)\b|\b(?:metronome|click)\b.*\b(?:start|play|begin)\b",
            )?,
            metronome_stop: pattern("metronome_stop", r"\b(?:stop|pause|halt|end)\b")?,
            bpm_keyword: pattern(
                "bpm_keyword",
                r"\b(?:set\s+)?(?:the\s+)?(?:tempo|bpm|beat)\s+(?:(?:to|is|at)\s+)?(.+)$",
            )?,
            bpm_suffix: pattern("bpm_suffix", r"\b(\d+)\s+bpm\b")?,
            bare_bpm: pattern("bare_bpm", r"\b(\d{2,3})\b")?,
            // Both step patterns need a token after the keyword; "increase" on
            // its own is left to the nudge rule, which only knows faster/slower.
            tempo_up: pattern(
                "tempo_up",
                r"\b(?:faster|increase|speed up|up)\b(?:\s+(?:the\s+)?(?:tempo|bpm|speed))?(?:\s+by)?\s+(.+)$",
            )?,
            tempo_down: pattern(
                "tempo_down",
                r"\b(?:slower|decrease|slow down|down|reduce)\b(?:\s+(?:the\s+)?(?:tempo|bpm|speed))?(?:\s+by)?\s+(.+)$",
            )?,
            nudge_up: pattern("nudge_up", r"\b(?:faster|speed up)\b")?,
            nudge_down: pattern("nudge_down", r"\b(?:slower|slow down)\b")?,
            eighth: pattern("eighth", r"\b(?:eighths?|8ths)\b|\b8\b.*\bnotes?\b")?,
            eighth_ordinal: pattern("eighth_ordinal", r"\b8ths?\b")?,
            sixteenth: pattern(
                "sixteenth",
                r"\b(?:sixteenths?|16ths)\b|\b16\b.*\bnotes?\b",
            )?,
            sixteenth_ordinal: pattern("sixteenth_ordinal", r"\b16ths?\b")?,
            quarter: pattern("quarter", r"\bquarters?\b")?,
            triplet: pattern("triplet", r"\btriplets?\b")?,
            next_page: pattern(
                "next_page",
                r"\bnext\b.*\bpage\b|\bpage\b.*\bnext\b|^(?:turn|flip)\s+(?:the\s+)?page$",
            )?,
            previous_page: pattern(
                "previous_page",
                r"\b(?:previous|prev)\b.*\bpage\b|\bpage\b.*\b(?:previous|prev)\b|^(?:go\s+)?back$",
            )?,
            goto_page: pattern("goto_page", r"\bpage\s+(.+)$")?,
            page_turn: pattern(
                "page_turn",
                r"\b(?:flip|turn|page)\w*\b.*?\b(?:every|each)\s+(.+?)\s+(?:bars?|measures?)\b",
            )?,
            tap: pattern("tap", r"^tap(?:\s+tempo)?$")?,
        })
    }
}

/// Deterministic intent parser
pub struct IntentEngine {
    patterns: Patterns,
}

impl IntentEngine {
    /// Compile the rule battery
    pub fn new() -> Result<Self> {
        Ok(Self {
            patterns: Patterns::compile()?,
        })
    }

    /// Classify a command. Always returns an action; unmatched input yields
    /// [`Action::Unknown`] carrying the original text.
    pub fn classify(&self, raw: &str) -> Action {
        self.parse(raw).action
    }

    /// Classify a command and report which rule matched
    pub fn parse(&self, raw: &str) -> ParseResult {
        let utterance = Utterance::new(raw);

        let matched = RULE_ORDER
            .iter()
            .find_map(|rule| self.apply(*rule, &utterance).map(|action| (*rule, action)));

        let (rule, action) = matched.unwrap_or_else(|| (RuleId::Fallback, Action::unknown(raw)));
        tracing::debug!(
            normalized = %utterance.text,
            rule = %rule,
            action = %action,
            "classified command"
        );

        ParseResult {
            action,
            rule,
            normalized: utterance.text,
        }
    }

    fn apply(&self, rule: RuleId, u: &Utterance<'_>) -> Option<Action> {
        match rule {
            RuleId::Timer => self.timer(u),
            RuleId::MetronomeStart => self.metronome_start(u),
            RuleId::MetronomeStop => self
                .patterns
                .metronome_stop
                .is_match(&u.text)
                .then_some(Action::StopMetronome),
            RuleId::ExplicitBpm => self.explicit_bpm(u),
            RuleId::BareBpm => self.bare_bpm(u),
            RuleId::TempoStep => self.tempo_step(u),
            RuleId::TempoNudge => self.tempo_nudge(u),
            RuleId::Subdivision => self.subdivision(u),
            RuleId::RelativePage => self.relative_page(u),
            RuleId::AbsolutePage => self.absolute_page(u),
            RuleId::ScheduledPageTurn => self.scheduled_page_turn(u),
            RuleId::Tap => self.patterns.tap.is_match(&u.text).then_some(Action::Tap),
            RuleId::Fallback => None,
        }
    }

    fn timer(&self, u: &Utterance<'_>) -> Option<Action> {
        let p = &self.patterns;
        if !p.timer_topic.is_match(&u.text) {
            return None;
        }

        if let Some(ms) = self.timer_duration(u) {
            return Some(Action::SetTimer {
                ms,
                start: p.timer_start.is_match(&u.text),
            });
        }

        if p.timer_start.is_match(&u.text) {
            Some(Action::StartTimer)
        } else if p.timer_resume.is_match(&u.text) {
            Some(Action::ResumeTimer)
        } else if p.timer_pause.is_match(&u.text) {
            Some(Action::PauseTimer)
        } else if p.timer_cancel.is_match(&u.text) {
            Some(Action::CancelTimer)
        } else if p.timer_left.is_match(&u.text) {
            Some(Action::TimeLeft)
        } else {
            None
        }
    }

    fn timer_duration(&self, u: &Utterance<'_>) -> Option<u64> {
        let tail = self.patterns.timer_set.captures(&u.text)?.get(1)?.as_str();

        // `2:30` only survives in the lowered view
        if let Some(ms) = clock_ms(&u.lowered) {
            return Some(ms);
        }
        if let Some(ms) = resolve_duration_ms(tail) {
            return Some(ms);
        }

        // "90 and start": read the number, drop the trailing instruction
        let tokens: Vec<&str> = tail.split_whitespace().collect();
        let (seconds, _) = leading_number(&tokens)?;
        seconds.checked_mul(1_000).filter(|ms| *ms > 0)
    }

    fn metronome_start(&self, u: &Utterance<'_>) -> Option<Action> {
        let bare = matches!(u.text.as_str(), "start" | "play");
        (bare || self.patterns.metronome_start.is_match(&u.text)).then_some(Action::StartMetronome)
    }

    fn explicit_bpm(&self, u: &Utterance<'_>) -> Option<Action> {
        let p = &self.patterns;
        let from_keyword = p
            .bpm_keyword
            .captures(&u.text)
            .and_then(|caps| caps.get(1))
            .and_then(|tail| {
                let tokens: Vec<&str> = tail.as_str().split_whitespace().collect();
                leading_number(&tokens).map(|(value, _)| value)
            });

        let value = from_keyword.filter(|v| *v != 0).or_else(|| {
            p.bpm_suffix
                .captures(&u.text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| resolve_number(m.as_str()))
                .filter(|v| *v != 0)
        })?;

        Some(Action::set_bpm(value))
    }

    fn bare_bpm(&self, u: &Utterance<'_>) -> Option<Action> {
        if u.text.len() >= 10 {
            return None;
        }
        let digits = self.patterns.bare_bpm.captures(&u.text)?.get(1)?;
        let value = resolve_number(digits.as_str()).filter(|v| *v != 0)?;
        Some(Action::set_bpm(value))
    }

    fn tempo_step(&self, u: &Utterance<'_>) -> Option<Action> {
        let p = &self.patterns;
        let (tail, sign) = if let Some(caps) = p.tempo_up.captures(&u.text) {
            (caps.get(1)?.as_str(), 1)
        } else if let Some(caps) = p.tempo_down.captures(&u.text) {
            (caps.get(1)?.as_str(), -1)
        } else {
            return None;
        };

        let tokens: Vec<&str> = tail.split_whitespace().collect();
        let magnitude = leading_number(&tokens)
            .and_then(|(value, _)| i32::try_from(value).ok())
            .filter(|value| *value != 0)
            .unwrap_or(DEFAULT_TEMPO_STEP);

        Some(Action::AdjustBpm {
            change: sign * magnitude,
        })
    }

    fn tempo_nudge(&self, u: &Utterance<'_>) -> Option<Action> {
        let p = &self.patterns;
        if p.nudge_up.is_match(&u.text) {
            Some(Action::AdjustBpm {
                change: DEFAULT_TEMPO_STEP,
            })
        } else if p.nudge_down.is_match(&u.text) {
            Some(Action::AdjustBpm {
                change: -DEFAULT_TEMPO_STEP,
            })
        } else {
            None
        }
    }

    fn subdivision(&self, u: &Utterance<'_>) -> Option<Action> {
        let p = &self.patterns;
        let subdivision =
            if p.eighth.is_match(&u.text) || p.eighth_ordinal.is_match(&u.lowered) {
                Subdivision::Eighth
            } else if p.sixteenth.is_match(&u.text) || p.sixteenth_ordinal.is_match(&u.lowered) {
                Subdivision::Sixteenth
            } else if p.quarter.is_match(&u.text) {
                Subdivision::Quarter
            } else if p.triplet.is_match(&u.text) {
                Subdivision::Triplet
            } else {
                return None;
            };
        Some(Action::SetSubdivision { subdivision })
    }

    fn relative_page(&self, u: &Utterance<'_>) -> Option<Action> {
        let p = &self.patterns;
        if p.next_page.is_match(&u.text) {
            Some(Action::NextPage)
        } else if p.previous_page.is_match(&u.text) {
            Some(Action::PreviousPage)
        } else {
            None
        }
    }

    fn absolute_page(&self, u: &Utterance<'_>) -> Option<Action> {
        let tail = self.patterns.goto_page.captures(&u.text)?.get(1)?;
        let tokens: Vec<&str> = tail.as_str().split_whitespace().collect();
        let (value, _) = leading_number(&tokens)?;
        let page = u32::try_from(value).ok().filter(|page| *page != 0)?;
        Some(Action::GoToPage { page })
    }

    fn scheduled_page_turn(&self, u: &Utterance<'_>) -> Option<Action> {
        let count = self.patterns.page_turn.captures(&u.text)?.get(1)?;
        let value = resolve_number(count.as_str())?;
        let bars = u32::try_from(value).ok().filter(|bars| *bars != 0)?;
        Some(Action::SchedulePageTurn { bars })
    }
}
