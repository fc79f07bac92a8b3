//! Pull structured JSON out of free-form model output.
//!
//! Text-generation services wrap answers in prose or markdown fences. Both
//! helpers here cut the reply down to the part that should be JSON, and the
//! `parse_*` helpers then parse strictly. Every failure is reported as
//! [`RosterError::MalformedResponse`].

use serde::de::DeserializeOwned;

use crate::error::{Result, RosterError};

/// The span from the first `[` to the last `]`, inclusive.
pub fn json_array_span(raw: &str) -> Result<&str> {
    let start = raw
        .find('[')
        .ok_or_else(|| RosterError::MalformedResponse("no JSON array in response".to_string()))?;
    let end = raw
        .rfind(']')
        .ok_or_else(|| RosterError::MalformedResponse("no JSON array in response".to_string()))?;
    if end < start {
        return Err(RosterError::MalformedResponse(
            "array brackets out of order".to_string(),
        ));
    }
    Ok(&raw[start..=end])
}

/// Remove every ```` ```json ```` and ```` ``` ```` marker and trim.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse the bracketed array embedded in `raw`.
pub fn parse_embedded_array<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    let span = json_array_span(raw.trim())?;
    serde_json::from_str(span)
        .map_err(|e| RosterError::MalformedResponse(format!("failed to parse extracted array: {}", e)))
}

/// Parse `raw` as one JSON object after stripping code fences.
pub fn parse_fenced_object<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(&cleaned)
        .map_err(|e| RosterError::MalformedResponse(format!("failed to parse object: {}", e)))
}
