//! E2E tests for the Gemini fallback tier behind the REST API.

mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::TestHarness;
use rasoi_assistant::{GeminiClient, GeminiConfig};

/// Gemini response body wrapping the given model text.
fn gemini_response(content: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": content }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
}

async fn harness_with_gemini(server: &MockServer) -> TestHarness {
    let client = GeminiClient::new(GeminiConfig {
        api_key: Some("test-key".into()),
        endpoint: server.uri(),
        timeout_secs: 2,
        ..GeminiConfig::default()
    });
    TestHarness::with_fallback(Arc::new(client)).await
}

/// A phrasing the pattern table misses gets classified by the model and
/// drives the real handler.
#[tokio::test]
async fn e2e_gemini_classification_drives_handler() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.*:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&gemini_response(
            r#"{"intent": "MENU_AVAILABILITY_TOGGLE", "entities": {"items": ["lassi"], "available": true}, "confidence": 0.82}"#,
        )))
        .mount(&server)
        .await;

    let h = harness_with_gemini(&server).await;
    let (status, json) = h.parse("put the lassi back on the menu").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["intent"], "MENU_AVAILABILITY_TOGGLE");
    assert_eq!(
        json["data"]["message"],
        "Done! 1 item(s) now available: Mango Lassi"
    );

    // The logged user turn carries the model's confidence.
    let messages = h.log.messages().await;
    assert!((messages[0].confidence - 0.82).abs() < f64::EPSILON);
}

/// Unreachable model never surfaces an error: the parse answers with the
/// unknown-intent reply and confidence 0.
#[tokio::test]
async fn e2e_unreachable_gemini_degrades() {
    let client = GeminiClient::new(GeminiConfig {
        api_key: Some("test-key".into()),
        endpoint: "http://127.0.0.1:9".into(),
        timeout_secs: 1,
        ..GeminiConfig::default()
    });
    let h = TestHarness::with_fallback(Arc::new(client)).await;

    let (status, json) = h.parse("do something the patterns don't know").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["intent"], "UNKNOWN");
    assert_eq!(json["data"]["requires_confirmation"], false);
    assert_eq!(json["data"]["needs_clarification"], true);

    let messages = h.log.messages().await;
    assert_eq!(messages[0].confidence, 0.0);
}

/// No API key configured: degraded answer tells the user the feature is
/// disabled.
#[tokio::test]
async fn e2e_unconfigured_gemini_explains_itself() {
    let client = GeminiClient::new(GeminiConfig::default());
    let h = TestHarness::with_fallback(Arc::new(client)).await;

    let (status, json) = h.parse("something the patterns miss").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["intent"], "UNKNOWN");
    assert_eq!(json["data"]["needs_clarification"], true);
    assert_eq!(
        json["data"]["message"],
        "AI features require a Gemini API key."
    );
}

/// Garbage model output degrades to the generic unknown reply.
#[tokio::test]
async fn e2e_garbage_model_output_degrades() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.*:generateContent$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&gemini_response("let me think about that for a while...")),
        )
        .mount(&server)
        .await;

    let h = harness_with_gemini(&server).await;
    let (status, json) = h.parse("something unusual").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["intent"], "UNKNOWN");
    assert!(
        json["data"]["message"]
            .as_str()
            .unwrap()
            .contains("I couldn't understand that")
    );
}

/// The model cannot inject intents outside the closed set.
#[tokio::test]
async fn e2e_model_cannot_widen_the_intent_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.*:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&gemini_response(
            r#"{"intent": "WIPE_DATABASE", "entities": {}, "confidence": 0.99}"#,
        )))
        .mount(&server)
        .await;

    let h = harness_with_gemini(&server).await;
    let (_, json) = h.parse("wipe everything").await;
    assert_eq!(json["data"]["intent"], "UNKNOWN");
}

/// Pattern hits never consult the model at all.
#[tokio::test]
async fn e2e_pattern_hit_skips_gemini() {
    let server = MockServer::start().await;
    // No mock mounted: any request to the server would 404 and degrade.
    let h = harness_with_gemini(&server).await;

    let (_, json) = h.parse("86 the lassi").await;
    assert_eq!(json["data"]["intent"], "MENU_AVAILABILITY_TOGGLE");
    assert!(server.received_requests().await.unwrap().is_empty());
}
