use positivity_llm::{ChatMessage, CompletionOptions};

use super::request_validator::Context;

pub const FORMAL_TONE: &str = "professional yet empathetic";
pub const INFORMAL_TONE: &str = "friendly and understanding";

pub const TRANSFORM_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.3,
    top_p: 0.7,
    max_tokens: 1024,
};

pub const ANALYSIS_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.2,
    top_p: 0.8,
    max_tokens: 256,
};

const TRANSFORM_SYSTEM_PROMPT: &str = "You are an expert at transforming text to be more positive, empathetic, and appropriate.
Show understanding of emotions and perspectives while being constructive.
Respond with ONLY a JSON object containing 'text' and 'improvements' fields, where 'improvements' is a list of short descriptions of what you changed.
Do not add any explanatory text before or after the JSON.";

const ANALYSIS_SYSTEM_PROMPT: &str = "You are an expert at analysing the tone of written communication.
Answer with a line of the form 'Tone: <one or two word label>' followed by a one sentence explanation.";

pub fn tone_guideline(formality: &str) -> &'static str {
    if formality == "formal" {
        FORMAL_TONE
    } else {
        INFORMAL_TONE
    }
}

pub fn build_context_prompt(context: &Context) -> String {
    let mut parts = vec![
        format!("Situation: {}", context.situation),
        format!("Tone: {}", tone_guideline(&context.formality)),
    ];
    if let Some(additional) = context
        .additional_context
        .as_deref()
        .filter(|a| !a.is_empty())
    {
        parts.push(format!("Additional Context: {}", additional));
    }
    parts.join("\n")
}

pub fn transformation_messages(context_prompt: &str, text: &str) -> Vec<ChatMessage> {
    let user_prompt = format!(
        r#"Context Information:
{}

Original text: {}

Transform this text to:
1. Show understanding and empathy
2. Maintain a constructive approach
3. Be positive while acknowledging concerns
4. Keep the core message clear
5. Match the specified tone"#,
        context_prompt, text
    );

    vec![
        ChatMessage::system(TRANSFORM_SYSTEM_PROMPT),
        ChatMessage::user(user_prompt),
    ]
}

pub fn analysis_messages(text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(ANALYSIS_SYSTEM_PROMPT),
        ChatMessage::user(format!("Analyze the tone of this text:\n\n{}", text)),
    ]
}
