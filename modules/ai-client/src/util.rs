use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AiError, Result};

/// Truncate a string to at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Strip markdown code blocks from a response.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// The span from the first `{` to the last `}`, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    static OBJECT: OnceLock<Regex> = OnceLock::new();
    let re = OBJECT.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));
    re.find(text).map(|m| m.as_str())
}

/// Parse model output as JSON: strict first, then the embedded object.
pub fn parse_json_lenient(text: &str) -> Result<serde_json::Value> {
    let stripped = strip_code_blocks(text);
    if let Ok(value) = serde_json::from_str(stripped) {
        return Ok(value);
    }

    let candidate = extract_json_object(text)
        .ok_or_else(|| AiError::Parse("no JSON object found in model output".to_string()))?;
    serde_json::from_str(candidate).map_err(AiError::from)
}
