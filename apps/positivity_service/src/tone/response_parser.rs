use serde_json::Value;

use super::models::TransformationResult;

pub const GENERIC_IMPROVEMENT: &str = "Text transformed with empathy";
pub const ERROR_IMPROVEMENT: &str = "Error occurred during transformation";
pub const DEFAULT_TONE: &str = "neutral";

/// Returns the span from the first `{` to the last `}`, if any.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Reads the model's reply to a transformation prompt.
///
/// Prose around the JSON object is ignored. A reply with no parseable object
/// is taken as the rewritten text itself.
pub fn parse_transformation(raw: &str, original_text: &str) -> TransformationResult {
    let parsed = extract_json_object(raw)
        .and_then(|json| serde_json::from_str::<Value>(json).ok())
        .and_then(|value| match value {
            Value::Object(map) => Some(map),
            _ => None,
        });

    let Some(map) = parsed else {
        return TransformationResult {
            text: raw.trim().to_string(),
            improvements: vec![GENERIC_IMPROVEMENT.to_string()],
        };
    };

    let text = map
        .get("text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| original_text.to_string());

    let improvements = match map.get("improvements").and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        None => vec![GENERIC_IMPROVEMENT.to_string()],
    };

    TransformationResult { text, improvements }
}

pub fn degraded_transformation(original_text: &str) -> TransformationResult {
    TransformationResult {
        text: original_text.to_string(),
        improvements: vec![ERROR_IMPROVEMENT.to_string()],
    }
}

/// Pulls the label after `tone:` (any case) up to the end of that line.
pub fn extract_tone_label(raw: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `raw`.
    let lowered = raw.to_ascii_lowercase();
    let Some(marker) = lowered.find("tone:") else {
        return DEFAULT_TONE.to_string();
    };

    let rest = &raw[marker + "tone:".len()..];
    let label = rest.lines().next().unwrap_or_default().trim();
    let label = label.trim_matches(|c: char| c == '*' || c == '"' || c == '.').trim();

    if label.is_empty() {
        DEFAULT_TONE.to_string()
    } else {
        label.to_string()
    }
}
