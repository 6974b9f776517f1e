//! Integration tests for connection probing against mock providers.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use inkwright::core::probe::{ProbeOutcome, Prober};
use inkwright::core::provider::Provider;
use inkwright::test_utils::{
    descriptor_at, ollama_tags_json, openai_models_json, openai_reply_json,
};

fn raw_json(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json")
}

// =============================================================================
// Keyed providers
// =============================================================================

#[tokio::test]
async fn keyed_probe_accepted_is_reachable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer sk-live"))
        .respond_with(raw_json(&openai_reply_json("OK")))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = descriptor_at(
        Provider::OpenAi,
        &format!("{}/v1/chat/completions", server.uri()),
    );
    let prober = Prober::new().unwrap();
    let report = prober.probe(&descriptor, Some("sk-live")).await;

    assert_eq!(report.outcome, ProbeOutcome::Reachable);
    assert!(report.is_usable());
    assert_eq!(report.provider, Provider::OpenAi);
    assert!(report.discovered_models.is_none());
}

#[tokio::test]
async fn keyed_probe_rejected_key_is_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error": "bad key"}"#))
        .mount(&server)
        .await;

    let descriptor = descriptor_at(
        Provider::Groq,
        &format!("{}/openai/v1/chat/completions", server.uri()),
    );
    let prober = Prober::new().unwrap();
    let report = prober.probe(&descriptor, Some("gsk_wrong")).await;

    assert_eq!(report.outcome, ProbeOutcome::Unreachable);
    assert!(report.detail.contains("API key rejected"), "detail: {}", report.detail);
    assert!(report.detail.contains("401"), "detail: {}", report.detail);
}

#[tokio::test]
async fn keyed_probe_without_key_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(raw_json(&openai_reply_json("OK")))
        .expect(0)
        .mount(&server)
        .await;

    let descriptor = descriptor_at(
        Provider::Mistral,
        &format!("{}/v1/chat/completions", server.uri()),
    );
    let prober = Prober::new().unwrap();
    let report = prober.probe(&descriptor, None).await;

    assert_eq!(report.outcome, ProbeOutcome::Unreachable);
    assert!(report.detail.contains("no API key"), "detail: {}", report.detail);
}

// =============================================================================
// Custom endpoints
// =============================================================================

#[tokio::test]
async fn custom_endpoint_any_answer_counts_as_reachable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such route"))
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::Custom, &server.uri());
    let prober = Prober::new().unwrap();
    let report = prober.probe(&descriptor, Some("any-key")).await;

    assert_eq!(report.outcome, ProbeOutcome::Reachable);
    assert!(report.detail.contains("HTTP 404"), "detail: {}", report.detail);
}

#[tokio::test]
async fn custom_endpoint_auth_rejection_is_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::Custom, &server.uri());
    let prober = Prober::new().unwrap();
    let report = prober.probe(&descriptor, Some("bad-key")).await;

    assert_eq!(report.outcome, ProbeOutcome::Unreachable);
    assert!(report.detail.contains("API key rejected"), "detail: {}", report.detail);
}

#[tokio::test]
async fn custom_transport_failure_with_key_is_unverified() {
    // Nothing listens here; the connection is refused before any HTTP happens.
    let descriptor = descriptor_at(Provider::Custom, "http://127.0.0.1:9");
    let prober = Prober::new().unwrap();
    let report = prober.probe(&descriptor, Some("configured-key")).await;

    assert_eq!(report.outcome, ProbeOutcome::Unverified);
    assert!(report.is_usable());
    assert!(
        report.detail.contains("not verified"),
        "detail: {}",
        report.detail
    );
}

#[tokio::test]
async fn custom_transport_failure_without_key_is_unreachable() {
    let descriptor = descriptor_at(Provider::Custom, "http://127.0.0.1:9");
    let prober = Prober::new().unwrap();
    let report = prober.probe(&descriptor, None).await;

    assert_eq!(report.outcome, ProbeOutcome::Unreachable);
}

// =============================================================================
// Local daemons and model discovery
// =============================================================================

#[tokio::test]
async fn ollama_probe_discovers_installed_models() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(raw_json(&ollama_tags_json(&["llama3.2", "mistral"])))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::Ollama, &server.uri());
    let prober = Prober::new().unwrap();
    let report = prober.probe(&descriptor, None).await;

    assert_eq!(report.outcome, ProbeOutcome::Reachable);
    assert_eq!(
        report.discovered_models,
        Some(vec!["llama3.2".to_string(), "mistral".to_string()])
    );
    assert!(report.detail.contains("2 models"), "detail: {}", report.detail);
}

#[tokio::test]
async fn daemon_with_no_models_is_unreachable_but_reports_the_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(raw_json(&ollama_tags_json(&[])))
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::Ollama, &server.uri());
    let prober = Prober::new().unwrap();
    let report = prober.probe(&descriptor, None).await;

    assert_eq!(report.outcome, ProbeOutcome::Unreachable);
    assert_eq!(report.discovered_models, Some(Vec::new()));
    assert!(
        report.detail.contains("no models are installed"),
        "detail: {}",
        report.detail
    );
}

#[tokio::test]
async fn daemon_down_reports_no_models() {
    let descriptor = descriptor_at(Provider::Ollama, "http://127.0.0.1:9");
    let prober = Prober::new().unwrap();
    let report = prober.probe(&descriptor, None).await;

    assert_eq!(report.outcome, ProbeOutcome::Unreachable);
    assert!(report.discovered_models.is_none());
}

#[tokio::test]
async fn lmstudio_discovery_reads_openai_model_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(raw_json(&openai_models_json(&["qwen2.5-7b-instruct"])))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = descriptor_at(Provider::LmStudio, &server.uri());
    let prober = Prober::new().unwrap();
    let models = prober.discover_models(&descriptor).await.unwrap();

    assert_eq!(models, vec!["qwen2.5-7b-instruct".to_string()]);
}
