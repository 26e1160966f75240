//! Timer duration resolution

use crate::numbers::{resolve_number, MAX_PHRASE_TOKENS};

const SECOND_MS: u64 = 1_000;
const MINUTE_MS: u64 = 60_000;

const SECOND_MARKERS: [&str; 5] = ["s", "sec", "secs", "second", "seconds"];
const MINUTE_MARKERS: [&str; 5] = ["m", "min", "mins", "minute", "minutes"];

/// Resolve a duration phrase into milliseconds.
///
/// Forms are tried in order: `mm:ss`, a number with a seconds marker, a
/// number with a minutes marker, then a bare number read as seconds.
pub fn resolve_duration_ms(phrase: &str) -> Option<u64> {
    let phrase = phrase.trim();

    if let Some(ms) = clock_ms(phrase) {
        return Some(ms);
    }

    let tokens: Vec<&str> = phrase.split_whitespace().collect();
    if let Some(value) = marked_number(&tokens, &SECOND_MARKERS) {
        return value.checked_mul(SECOND_MS);
    }
    if let Some(value) = marked_number(&tokens, &MINUTE_MARKERS) {
        return value.checked_mul(MINUTE_MS);
    }

    resolve_number(phrase)?.checked_mul(SECOND_MS)
}

/// Find `mm:ss` anywhere in the phrase (1-3 digit minutes, 1-2 digit seconds)
pub(crate) fn clock_ms(phrase: &str) -> Option<u64> {
    phrase.split_whitespace().find_map(|token| {
        let token = token.trim_matches(|c: char| !c.is_ascii_digit() && c != ':');
        let (minutes, seconds) = token.split_once(':')?;
        let digits = |s: &str, max: usize| {
            (!s.is_empty() && s.len() <= max && s.chars().all(|c| c.is_ascii_digit()))
                .then(|| s.parse::<u64>().ok())
                .flatten()
        };
        let minutes = digits(minutes, 3)?;
        let seconds = digits(seconds, 2)?;
        (minutes * 60 + seconds).checked_mul(SECOND_MS)
    })
}

/// A number followed by one of `markers`, either attached (`30s`, `5min`)
/// or as the next token after a numeric phrase (`two minutes`).
fn marked_number(tokens: &[&str], markers: &[&str]) -> Option<u64> {
    for (i, token) in tokens.iter().enumerate() {
        let digit_end = token
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(token.len());
        if digit_end > 0 && markers.contains(&&token[digit_end..]) {
            if let Ok(value) = token[..digit_end].parse::<u64>() {
                return Some(value);
            }
        }

        if markers.contains(token) {
            // Longest run of tokens directly before the marker that resolves
            let earliest = i.saturating_sub(MAX_PHRASE_TOKENS);
            if let Some(value) =
                (earliest..i).find_map(|start| resolve_number(&tokens[start..i].join(" ")))
            {
                return Some(value);
            }
        }
    }
    None
}
