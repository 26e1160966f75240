//! Pull an action out of free-form model output

use crate::ProviderError;
use drum_intent::Action;

/// Parse the action a provider returned.
///
/// Accepts bare JSON, JSON in a fenced code block, or a JSON object embedded
/// in prose (first `{` to last `}`).
pub fn extract_action(content: &str) -> Result<Action, ProviderError> {
    let trimmed = content.trim();
    if let Ok(action) = serde_json::from_str::<Action>(trimmed) {
        return Ok(action);
    }

    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    let object = match (start, end) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => {
            return Err(ProviderError::InvalidResponse(format!(
                "no JSON object in {:?}",
                truncate(trimmed, 80)
            )))
        }
    };

    serde_json::from_str::<Action>(object)
        .map_err(|e| ProviderError::InvalidResponse(format!("{} in {:?}", e, truncate(object, 80))))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
