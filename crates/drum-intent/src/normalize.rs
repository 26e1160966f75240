//! Text normalization for spoken and typed commands

const ORDINAL_SUFFIXES: [&str; 4] = ["st", "nd", "rd", "th"];

/// Canonicalize a command before rule matching.
///
/// Lower-cases, drops ordinal suffixes attached to digits (`3rd` -> `3`),
/// replaces everything except letters, digits, hyphens and whitespace with a
/// space, then collapses and trims whitespace. Hyphens survive so compound
/// number words like `twenty-one` reach the number resolver intact.
pub fn normalize(input: &str) -> String {
    let lowered = input.to_lowercase();

    let mut cleaned = String::with_capacity(lowered.len());
    let mut word = String::new();
    for c in lowered.chars() {
        if c.is_alphanumeric() {
            word.push(c);
            continue;
        }
        flush_word(&mut word, &mut cleaned);
        if c == '-' || c.is_whitespace() {
            cleaned.push(c);
        } else {
            cleaned.push(' ');
        }
    }
    flush_word(&mut word, &mut cleaned);

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn flush_word(word: &mut String, out: &mut String) {
    out.push_str(strip_ordinal(word));
    word.clear();
}

/// `21st` -> `21`; anything else is returned unchanged
fn strip_ordinal(word: &str) -> &str {
    for suffix in ORDINAL_SUFFIXES {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.chars().last().is_some_and(|c| c.is_ascii_digit()) {
                // Only the digit run directly before the suffix is the number
                return stem;
            }
        }
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        assert_eq!(normalize("  Set TEMPO to 120!! "), "set tempo to 120");
        assert_eq!(normalize("Go to the 3rd page."), "go to the 3 page");
        assert_eq!(normalize("twenty-one"), "twenty-one");
        assert_eq!(normalize("what's\tthe\n\ntempo?"), "what s the tempo");
        assert_eq!(normalize("2:30"), "2 30");
    }

    #[test]
    fn test_ordinals_only_after_digits() {
        assert_eq!(normalize("1st 2nd 3rd 4th"), "1 2 3 4");
        assert_eq!(normalize("first"), "first");
        assert_eq!(normalize("8ths"), "8ths");
        assert_eq!(normalize("north"), "north");
        assert_eq!(normalize("16th-notes"), "16-notes");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("?!."), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Flip every FOUR bars",
            "1st2nd",
            "set a timer for 2:30, then go!",
            "  - hyphen -- runs - ",
            "Tempo: one-hundred & twenty",
            "",
        ];

        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {:?}", input);
        }
    }
}
