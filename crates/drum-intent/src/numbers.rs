//! Spoken number resolution
//!
//! Turns digits ("120"), single words ("seven"), two-word compounds
//! ("twenty one", "twenty-one") and magnitude phrases ("one hundred twenty",
//! "two thousand five") into integers. Anything outside that vocabulary is
//! unresolved; there is no partial credit.

const BASE_WORDS: &[(&str, u64)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

fn base_word(word: &str) -> Option<u64> {
    BASE_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, value)| *value)
}

/// Resolve a token or short phrase into a number.
///
/// Digit strings resolve to their value (including zero); word phrases that
/// add up to zero are unresolved so callers never accept a silent zero.
pub fn resolve_number(token: &str) -> Option<u64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if token.chars().all(|c| c.is_ascii_digit()) {
        return token.parse::<u64>().ok();
    }

    if token.contains(char::is_whitespace) {
        if let Some(value) = resolve_phrase(token) {
            return Some(value);
        }
    }

    let spaced = token.replace('-', " ");
    if let Some(value) = base_word(spaced.trim()) {
        return Some(value);
    }

    let parts: Vec<&str> = spaced.split_whitespace().collect();
    match parts.as_slice() {
        [first, second] => Some(base_word(first)? + base_word(second)?),
        _ => None,
    }
}

/// Accumulate a multi-magnitude phrase ("one hundred and twenty").
fn resolve_phrase(phrase: &str) -> Option<u64> {
    let mut total: u64 = 0;
    let mut current: Option<u64> = None;

    for word in phrase.split(|c: char| c.is_whitespace() || c == '-') {
        match word {
            "" | "and" => continue,
            "hundred" => {
                current = Some(current.unwrap_or(1).checked_mul(100)?);
            }
            "thousand" => {
                let block = current.unwrap_or(1).checked_mul(1000)?;
                total = total.checked_add(block)?;
                current = Some(0);
            }
            _ => {
                let value = base_word(word)?;
                current = Some(current.unwrap_or(0).checked_add(value)?);
            }
        }
    }

    let result = total.checked_add(current.unwrap_or(0))?;
    (result != 0).then_some(result)
}

/// Longest word run a spoken number can span
/// ("nine hundred and ninety nine thousand nine hundred and ninety nine")
pub(crate) const MAX_PHRASE_TOKENS: usize = 12;

/// Resolve the longest leading run of `tokens` that forms a number.
///
/// Returns the value and how many tokens it consumed, so "140 please" reads
/// 140 and "one hundred twenty now" reads 120. Only the first
/// [`MAX_PHRASE_TOKENS`] tokens are considered.
pub fn leading_number(tokens: &[&str]) -> Option<(u64, usize)> {
    (1..=tokens.len().min(MAX_PHRASE_TOKENS))
        .rev()
        .find_map(|len| resolve_number(&tokens[..len].join(" ")).map(|value| (value, len)))
}
