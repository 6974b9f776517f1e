//! Integration tests for request dispatch against mock providers.
//!
//! Each wire dialect gets a mock server that asserts the request shape
//! (path, auth headers, body fields) and returns a canned reply, verifying
//! that dispatch builds the right request and normalizes the response.

use std::time::Duration;

use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use inkwright::core::dispatch::{Dispatcher, RequestParams};
use inkwright::core::provider::Provider;
use inkwright::error::InkwrightError;
use inkwright::test_utils::{
    anthropic_reply_json, descriptor_at, gemini_reply_json, ollama_reply_json, openai_reply_json,
};

fn raw_json(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json")
}

// =============================================================================
// Dialect request shapes
// =============================================================================

#[tokio::test]
async fn openai_dialect_sends_bearer_and_reads_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test-123"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-test",
            "max_tokens": 2048,
            "messages": [{"role": "user", "content": "Say hi"}]
        })))
        .respond_with(raw_json(&openai_reply_json("Hi there")))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = descriptor_at(
        Provider::Custom,
        &format!("{}/v1/chat/completions", server.uri()),
    );
    let dispatcher = Dispatcher::new().unwrap();
    let reply = dispatcher
        .send(
            &descriptor,
            Some("sk-test-123"),
            "gpt-test",
            "Say hi",
            RequestParams::default(),
        )
        .await
        .unwrap();

    assert_eq!(reply, "Hi there");
}

#[tokio::test]
async fn anthropic_dialect_uses_api_key_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(serde_json::json!({
            "model": "claude-test",
            "messages": [{"role": "user", "content": "Say hi"}]
        })))
        .respond_with(raw_json(&anthropic_reply_json("Hello from Claude")))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::Claude, &server.uri());
    let dispatcher = Dispatcher::new().unwrap();
    let reply = dispatcher
        .send(
            &descriptor,
            Some("sk-ant-test"),
            "claude-test",
            "Say hi",
            RequestParams::default(),
        )
        .await
        .unwrap();

    assert_eq!(reply, "Hello from Claude");
}

#[tokio::test]
async fn gemini_dialect_threads_key_through_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gemini-test:generateContent"))
        .and(query_param("key", "AIza-test"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"parts": [{"text": "Say hi"}]}]
        })))
        .respond_with(raw_json(&gemini_reply_json("Hello from Gemini")))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::Gemini, &server.uri());
    let dispatcher = Dispatcher::new().unwrap();
    let reply = dispatcher
        .send(
            &descriptor,
            Some("AIza-test"),
            "gemini-test",
            "Say hi",
            RequestParams::default(),
        )
        .await
        .unwrap();

    assert_eq!(reply, "Hello from Gemini");
}

#[tokio::test]
async fn ollama_daemon_posts_to_chat_path_without_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama3.2",
            "stream": false,
            "options": {"num_predict": 2048}
        })))
        .respond_with(raw_json(&ollama_reply_json("Local hello")))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::Ollama, &server.uri());
    let dispatcher = Dispatcher::new().unwrap();
    let reply = dispatcher
        .send(&descriptor, None, "llama3.2", "Say hi", RequestParams::default())
        .await
        .unwrap();

    assert_eq!(reply, "Local hello");
}

// =============================================================================
// Failure mapping
// =============================================================================

#[tokio::test]
async fn missing_key_short_circuits_without_io() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(raw_json(&openai_reply_json("never sent")))
        .expect(0)
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::Custom, &server.uri());
    let dispatcher = Dispatcher::new().unwrap();
    let err = dispatcher
        .send(&descriptor, None, "gpt-test", "Say hi", RequestParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, InkwrightError::MissingCredential { .. }));
}

#[tokio::test]
async fn upstream_http_error_carries_status_and_snippet() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::Custom, &server.uri());
    let dispatcher = Dispatcher::new().unwrap();
    let err = dispatcher
        .send(
            &descriptor,
            Some("sk-test"),
            "gpt-test",
            "Say hi",
            RequestParams::default(),
        )
        .await
        .unwrap_err();

    match err {
        InkwrightError::Upstream { detail, .. } => {
            assert!(detail.contains("HTTP 500"), "detail: {detail}");
            assert!(detail.contains("backend exploded"), "detail: {detail}");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::Custom, &server.uri());
    let dispatcher = Dispatcher::new().unwrap();
    let err = dispatcher
        .send(
            &descriptor,
            Some("sk-test"),
            "gpt-test",
            "Say hi",
            RequestParams::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, InkwrightError::MalformedResponse { .. }));
}

#[tokio::test]
async fn reply_missing_from_payload_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(raw_json(r#"{"object": "chat.completion", "choices": []}"#))
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::Custom, &server.uri());
    let dispatcher = Dispatcher::new().unwrap();
    let err = dispatcher
        .send(
            &descriptor,
            Some("sk-test"),
            "gpt-test",
            "Say hi",
            RequestParams::default(),
        )
        .await
        .unwrap_err();

    match err {
        InkwrightError::MalformedResponse { detail, .. } => {
            assert!(detail.contains("reply text missing"), "detail: {detail}");
        }
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn whitespace_only_completion_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(raw_json(&openai_reply_json("   \n  ")))
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::Custom, &server.uri());
    let dispatcher = Dispatcher::new().unwrap();
    let err = dispatcher
        .send(
            &descriptor,
            Some("sk-test"),
            "gpt-test",
            "Say hi",
            RequestParams::default(),
        )
        .await
        .unwrap_err();

    match err {
        InkwrightError::MalformedResponse { detail, .. } => {
            assert!(detail.contains("empty completion"), "detail: {detail}");
        }
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            raw_json(&openai_reply_json("too late")).set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::Custom, &server.uri());
    let dispatcher = Dispatcher::with_timeout(Duration::from_millis(50)).unwrap();
    let err = dispatcher
        .send(
            &descriptor,
            Some("sk-test"),
            "gpt-test",
            "Say hi",
            RequestParams::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, InkwrightError::Timeout { .. }), "got {err:?}");
}
