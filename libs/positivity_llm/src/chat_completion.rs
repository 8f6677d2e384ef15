use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{ChatMessage, CompletionOptions, LLMService};

pub const DEFAULT_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";
pub const DEFAULT_MODEL: &str = "meta/llama-3.1-405b-instruct";

/// Connection settings for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatCompletionSettings {
    pub base_url: String,
    pub api_key: String,
    pub org_id: Option<String>,
    pub model: String,
}

impl ChatCompletionSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            org_id: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

// The key must never reach a log line.
impl std::fmt::Debug for ChatCompletionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("org_id", &self.org_id.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

pub struct ChatCompletionService {
    client: Client,
    settings: ChatCompletionSettings,
}

impl ChatCompletionService {
    pub fn new(settings: ChatCompletionSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url)
    }
}

#[async_trait]
impl LLMService for ChatCompletionService {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: &CompletionOptions,
    ) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.settings.model,
            messages: &messages,
            temperature: options.temperature,
            top_p: options.top_p,
            max_tokens: options.max_tokens,
            stream: false,
        };

        let mut builder = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(&request);
        if let Some(org_id) = &self.settings.org_id {
            builder = builder.header("Organization-Id", org_id);
        }

        let response = builder
            .send()
            .await
            .context("Failed to send chat completion request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "API returned error status: {}, body: {}",
                status,
                error_text
            ));
        }

        let response: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("No content in chat completion response")?;

        tracing::debug!(model = %self.settings.model, chars = content.len(), "chat completion received");

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let settings = ChatCompletionSettings::new("key").with_base_url("http://localhost:9/v1/");
        let service = ChatCompletionService::new(settings);
        assert_eq!(service.endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let settings = ChatCompletionSettings::new("nvapi-secret").with_org_id("org-secret");
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("nvapi-secret"));
        assert!(!rendered.contains("org-secret"));
        assert!(rendered.contains(DEFAULT_MODEL));
    }

    #[test]
    fn request_body_carries_sampling_parameters() {
        let messages = vec![ChatMessage::user("hello")];
        let request = ChatCompletionRequest {
            model: "m",
            messages: &messages,
            temperature: 0.3,
            top_p: 0.7,
            max_tokens: 1024,
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "m");
        assert_eq!(value["max_tokens"], 1024);
        assert_eq!(value["stream"], false);
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
