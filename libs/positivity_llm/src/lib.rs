use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

pub mod chat_completion;

pub use chat_completion::{ChatCompletionService, ChatCompletionSettings};

#[derive(Debug, Clone)]
pub enum LLMProvider {
    ChatCompletion(ChatCompletionSettings),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every completion request.
///
/// The default is the provider's neutral sampling; callers pick their own
/// values per prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 1.0,
            max_tokens: 1024,
        }
    }
}

/// A backend able to turn a list of chat messages into a single completion.
#[async_trait]
pub trait LLMService {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: &CompletionOptions,
    ) -> Result<String>;
}

pub struct LLMClientConfig {
    pub timeout: Duration,
}

impl Default for LLMClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Wraps an [`LLMService`] and bounds every call by the configured timeout.
///
/// A single attempt is made per call. Dropping the returned future cancels
/// the in-flight request.
pub struct LLMClient {
    service: Box<dyn LLMService + Send + Sync>,
    config: LLMClientConfig,
}

impl LLMClient {
    pub fn new(provider: LLMProvider, config: Option<LLMClientConfig>) -> Self {
        let service: Box<dyn LLMService + Send + Sync> = match provider {
            LLMProvider::ChatCompletion(settings) => {
                Box::new(ChatCompletionService::new(settings))
            }
        };

        Self::with_service(service, config)
    }

    pub fn with_service(
        service: Box<dyn LLMService + Send + Sync>,
        config: Option<LLMClientConfig>,
    ) -> Self {
        Self {
            service,
            config: config.unwrap_or_default(),
        }
    }

    async fn execute_with_timeout<Fut, T>(&self, operation_name: &str, operation: Fut) -> Result<T>
    where
        Fut: std::future::Future<Output = Result<T>>,
    {
        match timeout(self.config.timeout, operation).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    "{} timed out after {:?}",
                    operation_name,
                    self.config.timeout
                );
                Err(anyhow::anyhow!(
                    "{} timed out after {:?}",
                    operation_name,
                    self.config.timeout
                ))
            }
        }
    }

    pub async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: &CompletionOptions,
    ) -> Result<String> {
        self.execute_with_timeout("Chat completion", self.service.complete(messages, options))
            .await
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    struct SlowService {
        delay: Duration,
        finished: Arc<AtomicBool>,
    }

    impl SlowService {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                finished: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    #[async_trait]
    impl LLMService for SlowService {
        async fn complete(
            &self,
            messages: Vec<ChatMessage>,
            _options: &CompletionOptions,
        ) -> Result<String> {
            tokio::time::sleep(self.delay).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(format!("{} messages", messages.len()))
        }
    }

    #[test]
    fn chat_roles_serialize_lowercase() {
        let message = ChatMessage::system("be kind");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "system");
        assert_eq!(value["content"], "be kind");
    }

    #[tokio::test]
    async fn completes_within_timeout() {
        let client =
            LLMClient::with_service(Box::new(SlowService::new(Duration::from_millis(1))), None);

        let reply = client
            .complete(
                vec![ChatMessage::system("a"), ChatMessage::user("b")],
                &CompletionOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(reply, "2 messages");
    }

    #[tokio::test]
    async fn expired_timeout_is_an_error() {
        let client =
            LLMClient::with_service(Box::new(SlowService::new(Duration::from_secs(5))), None)
                .with_timeout(Duration::from_millis(20));

        let err = client
            .complete(vec![ChatMessage::user("hi")], &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
        assert_eq!(client.timeout(), Duration::from_millis(20));
    }

    #[tokio::test]
    async fn dropping_the_call_cancels_the_backend() {
        let service = SlowService::new(Duration::from_millis(200));
        let finished = service.finished.clone();
        let client = LLMClient::with_service(Box::new(service), None);

        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            client.complete(vec![ChatMessage::user("hi")], &CompletionOptions::default()),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[test]
    fn default_sampling_is_neutral() {
        let options = CompletionOptions::default();
        assert_eq!(options.temperature, 1.0);
        assert_eq!(options.top_p, 1.0);
    }
}
