use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_SITUATION: &str = "other";
pub const DEFAULT_FORMALITY: &str = "formal";

/// How missing context fields are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContextPolicy {
    /// Missing fields fall back to `other` / `formal`.
    #[default]
    Defaulting,
    /// `situation` and `formality` must be supplied.
    Strict,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid context format")]
    InvalidContextFormat,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Text is required")]
    MissingText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub situation: String,
    pub formality: String,
    pub additional_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRequest {
    pub text: String,
    pub context: Context,
}

// Older clients send `importance` where newer ones send `formality`.
#[derive(Debug, Deserialize)]
struct RawContext {
    #[serde(default)]
    situation: Option<String>,
    #[serde(default)]
    formality: Option<String>,
    #[serde(default)]
    importance: Option<String>,
    #[serde(default, rename = "additionalContext")]
    additional_context: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn parse_context(raw: &str, policy: ContextPolicy) -> Result<Context, ValidationError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|_| ValidationError::InvalidContextFormat)?;
    if !value.is_object() {
        return Err(ValidationError::InvalidContextFormat);
    }
    let raw: RawContext =
        serde_json::from_value(value).map_err(|_| ValidationError::InvalidContextFormat)?;

    let situation = non_empty(raw.situation);
    let formality = non_empty(raw.formality).or_else(|| non_empty(raw.importance));
    let additional_context = non_empty(raw.additional_context);

    let (situation, formality) = match policy {
        ContextPolicy::Defaulting => (
            situation.unwrap_or_else(|| DEFAULT_SITUATION.to_string()),
            formality.unwrap_or_else(|| DEFAULT_FORMALITY.to_string()),
        ),
        ContextPolicy::Strict => (
            situation.ok_or(ValidationError::MissingField("situation"))?,
            formality.ok_or(ValidationError::MissingField("formality"))?,
        ),
    };

    Ok(Context {
        situation,
        formality,
        additional_context,
    })
}

/// Turns raw form fields into an [`InputRequest`].
///
/// The text is kept verbatim; whitespace-only text counts as missing.
pub fn validate(
    text: Option<String>,
    context: Option<&str>,
    policy: ContextPolicy,
) -> Result<InputRequest, ValidationError> {
    let context = context.ok_or(ValidationError::MissingField("context"))?;
    let context = parse_context(context, policy)?;

    let text = text
        .filter(|t| !t.trim().is_empty())
        .ok_or(ValidationError::MissingText)?;

    Ok(InputRequest { text, context })
}
