/*!
 * Integration tests for the HTTP endpoints
 */

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use post_translator::app_config::Config;
use post_translator::errors::AppError;
use post_translator::server::{create_router, serve, AppState};
use post_translator::translation::FallbackPolicy;

use crate::common::mock_providers::{MockClassifier, MockErrorType, MockTranslator};
use crate::common::pipeline_with;

const PROBE: &str = "Hello, how are you?";

fn app(classifier: &MockClassifier, translator: &MockTranslator, fallback: FallbackPolicy) -> Router {
    create_router(AppState::new(pipeline_with(classifier, translator, fallback), PROBE))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_translate_withoutContent_shouldReturnEmptyEnglishResult() {
    let classifier = MockClassifier::answering("German");
    let translator = MockTranslator::answering("unused");

    let (status, body) = get(app(&classifier, &translator, FallbackPolicy::default()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"is_english": true, "translated_content": ""}));
    assert_eq!(classifier.call_count(), 0);
}

#[tokio::test]
async fn test_translate_withPercentEncodedContent_shouldDecodeAndTranslate() {
    let classifier = MockClassifier::answering("Chinese");
    let translator = MockTranslator::answering("This is a Chinese message");

    let uri = "/?content=%E8%BF%99%E6%98%AF%E4%B8%80%E6%9D%A1%E4%B8%AD%E6%96%87%E6%B6%88%E6%81%AF";
    let (status, body) = get(app(&classifier, &translator, FallbackPolicy::default()), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"is_english": false, "translated_content": "This is a Chinese message"}));
    assert_eq!(translator.last_request().as_deref(), Some("这是一条中文消息"));
}

#[tokio::test]
async fn test_translate_withEnglishContent_shouldEchoIt() {
    let classifier = MockClassifier::answering("English");
    let translator = MockTranslator::answering("unused");

    let (status, body) = get(
        app(&classifier, &translator, FallbackPolicy::default()),
        "/?content=This+is+an+English+message",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"is_english": true, "translated_content": "This is an English message"}));
    assert_eq!(translator.call_count(), 0);
}

#[tokio::test]
async fn test_translate_withBackendDown_shouldStillAnswerOk() {
    let classifier = MockClassifier::failing(MockErrorType::Connection);
    let translator = MockTranslator::answering("unused");

    let (status, body) = get(
        app(&classifier, &translator, FallbackPolicy::assume_foreign()),
        "/?content=Bonjour",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"is_english": false, "translated_content": "Bonjour"}));
}

#[tokio::test]
async fn test_health_withWorkingClassifier_shouldBeHealthy() {
    let classifier = MockClassifier::answering("English");
    let translator = MockTranslator::answering("unused");

    let (status, body) = get(app(&classifier, &translator, FallbackPolicy::default()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "ollama_connected": true}));
    assert_eq!(classifier.last_request().as_deref(), Some(PROBE));
    assert_eq!(translator.call_count(), 0);
}

#[tokio::test]
async fn test_health_withUnreachableClassifier_shouldBeUnavailable() {
    let classifier = MockClassifier::failing(MockErrorType::Connection);
    let translator = MockTranslator::answering("unused");

    let (status, body) = get(app(&classifier, &translator, FallbackPolicy::default()), "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"status": "unhealthy", "ollama_connected": false}));
}

#[tokio::test]
async fn test_health_withMalformedLabel_shouldBeUnavailable() {
    let classifier = MockClassifier::answering("Sorry, I cannot help with that.");
    let translator = MockTranslator::answering("unused");

    let (status, _) = get(app(&classifier, &translator, FallbackPolicy::default()), "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health_withNonEnglishLabel_shouldStillBeHealthy() {
    let classifier = MockClassifier::answering("Spanish");
    let translator = MockTranslator::answering("unused");

    let (status, _) = get(app(&classifier, &translator, FallbackPolicy::default()), "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_serve_withInvalidConfig_shouldReturnConfigErrorBeforeBinding() {
    let mut config = Config::default();
    config.backend.retry_count = 1000;

    match serve(&config).await {
        Err(AppError::Config(message)) => assert!(message.contains("Retry count")),
        other => panic!("expected a configuration error, got {:?}", other),
    }
}
