//! Chat client tests against a mocked OpenAI-compatible server

use ping_service::{
    chat::{ChatClient, ChatCompletionRequest, ChatMessage},
    config::ChatConfig,
    AppError,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_config(base_url: String) -> ChatConfig {
    ChatConfig {
        base_url,
        model: "qwen3-32b".to_string(),
        system_prompt: "You are a helpful assistant.".to_string(),
        timeout_ms: 5000,
        api_key_env: None,
    }
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "qwen3-32b",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 20, "completion_tokens": 5, "total_tokens": 25 }
    })
}

#[tokio::test]
async fn test_ask_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "qwen3-32b",
            "messages": [
                { "role": "system", "content": "You are a helpful assistant." },
                { "role": "user", "content": "Is light fast?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Very.")))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(&chat_config(format!("{}/v1", server.uri()))).unwrap();
    let reply = client
        .ask("You are a helpful assistant.", "Is light fast?")
        .await
        .unwrap();

    assert_eq!(reply.as_deref(), Some("Very."));
}

#[tokio::test]
async fn test_create_returns_full_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .mount(&server)
        .await;

    let client = ChatClient::new(&chat_config(format!("{}/v1/", server.uri()))).unwrap();
    let request = ChatCompletionRequest::new("qwen3-32b", vec![ChatMessage::user("hi")]);
    let response = client.create(&request).await.unwrap();

    assert_eq!(response.id, "chatcmpl-1");
    assert_eq!(response.choices.len(), 1);
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(25));
}

#[tokio::test]
async fn test_bearer_token_from_environment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-local"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("authorized")))
        .expect(1)
        .mount(&server)
        .await;

    std::env::set_var("PING_SERVICE_TEST_CHAT_KEY", "sk-local");
    let mut config = chat_config(format!("{}/v1", server.uri()));
    config.api_key_env = Some("PING_SERVICE_TEST_CHAT_KEY".to_string());

    let client = ChatClient::new(&config).unwrap();
    let reply = client.ask("sys", "hello").await.unwrap();

    assert_eq!(reply.as_deref(), Some("authorized"));
}

#[tokio::test]
async fn test_null_content_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": null },
                "finish_reason": "tool_calls"
            }]
        })))
        .mount(&server)
        .await;

    let client = ChatClient::new(&chat_config(format!("{}/v1", server.uri()))).unwrap();
    let reply = client.ask("sys", "hello").await.unwrap();

    assert!(reply.is_none());
}

#[tokio::test]
async fn test_non_success_status_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
        .mount(&server)
        .await;

    let client = ChatClient::new(&chat_config(format!("{}/v1", server.uri()))).unwrap();
    let err = client.ask("sys", "hello").await.unwrap_err();

    match err {
        AppError::Upstream(message) => {
            assert!(message.contains("503"), "{}", message);
            assert!(message.contains("model loading"), "{}", message);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_empty_choices_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = ChatClient::new(&chat_config(format!("{}/v1", server.uri()))).unwrap();
    let err = client.ask("sys", "hello").await.unwrap_err();

    assert!(matches!(err, AppError::Upstream(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    let client = ChatClient::new(&chat_config("http://127.0.0.1:9/v1".to_string())).unwrap();
    let err = client.ask("sys", "hello").await.unwrap_err();

    assert!(matches!(err, AppError::HttpClient(_)));
}
