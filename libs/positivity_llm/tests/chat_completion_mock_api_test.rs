//! Mock API tests for the chat-completion client.
//!
//! A wiremock server stands in for the OpenAI-compatible endpoint.

use std::time::Duration;

use positivity_llm::{
    ChatCompletionSettings, ChatMessage, CompletionOptions, LLMClient, LLMClientConfig,
    LLMProvider,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "meta/llama-3.1-405b-instruct",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21 }
    })
}

fn client_for(server: &MockServer, timeout: Duration) -> LLMClient {
    let settings = ChatCompletionSettings::new("test-api-key")
        .with_base_url(server.uri())
        .with_org_id("test-org")
        .with_model("test-model");
    LLMClient::new(
        LLMProvider::ChatCompletion(settings),
        Some(LLMClientConfig { timeout }),
    )
}

#[tokio::test]
async fn sends_authenticated_request_and_returns_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-api-key"))
        .and(header("Organization-Id", "test-org"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 1024,
            "stream": false,
            "messages": [
                { "role": "system", "content": "be nice" },
                { "role": "user", "content": "hello" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("  Hi there!  ")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let reply = client
        .complete(
            vec![ChatMessage::system("be nice"), ChatMessage::user("hello")],
            &CompletionOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(reply, "Hi there!");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let err = client
        .complete(vec![ChatMessage::user("hello")], &CompletionOptions::default())
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("500"), "unexpected error: {message}");
    assert!(message.contains("upstream exploded"));
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let result = client
        .complete(vec![ChatMessage::user("hello")], &CompletionOptions::default())
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn slow_upstream_hits_the_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_millis(100));
    let err = client
        .complete(vec![ChatMessage::user("hello")], &CompletionOptions::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn unreachable_upstream_is_an_error() {
    let settings = ChatCompletionSettings::new("test-api-key").with_base_url("http://127.0.0.1:1");
    let client = LLMClient::new(LLMProvider::ChatCompletion(settings), None);

    let result = client
        .complete(vec![ChatMessage::user("hello")], &CompletionOptions::default())
        .await;

    assert!(result.is_err());
}
