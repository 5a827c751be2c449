/*!
 * Integration tests for the Ollama client retry policy against a local backend
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use post_translator::errors::ProviderError;
use post_translator::providers::ollama::{GenerationRequest, Ollama};

/// Local stand-in for Ollama answering `/api/generate` with a scripted status sequence
struct ScriptedBackend {
    hits: AtomicUsize,
    statuses: Vec<StatusCode>,
}

async fn generate(State(backend): State<Arc<ScriptedBackend>>) -> (StatusCode, Json<Value>) {
    let hit = backend.hits.fetch_add(1, Ordering::SeqCst);
    let status = backend
        .statuses
        .get(hit)
        .or(backend.statuses.last())
        .copied()
        .unwrap_or(StatusCode::OK);

    if status.is_success() {
        (status, Json(json!({"model": "llama3.2:3b", "response": "German", "done": true})))
    } else {
        (status, Json(json!({"error": "scripted failure"})))
    }
}

/// Serve the scripted backend on an ephemeral port, returning its address and state
async fn spawn_backend(statuses: Vec<StatusCode>) -> (String, Arc<ScriptedBackend>) {
    let backend = Arc::new(ScriptedBackend { hits: AtomicUsize::new(0), statuses });
    let app = Router::new()
        .route("/api/generate", post(generate))
        .with_state(Arc::clone(&backend));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), backend)
}

fn request() -> GenerationRequest {
    GenerationRequest::new("llama3.2:3b", "Hier ist dein erstes Beispiel.")
}

#[tokio::test]
async fn test_generate_withServerErrors_shouldRetryUpToMaxRetriesPlusOne() {
    let (url, backend) = spawn_backend(vec![StatusCode::INTERNAL_SERVER_ERROR]).await;
    let client = Ollama::with_retries(url, Duration::from_secs(5), 2, 1);

    let error = client.generate(&request()).await.unwrap_err();

    assert!(matches!(error, ProviderError::ApiError { status_code: 500, .. }));
    assert_eq!(backend.hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_generate_withClientError_shouldNotRetry() {
    let (url, backend) = spawn_backend(vec![StatusCode::NOT_FOUND]).await;
    let client = Ollama::with_retries(url, Duration::from_secs(5), 3, 1);

    let error = client.generate(&request()).await.unwrap_err();

    assert!(matches!(error, ProviderError::ApiError { status_code: 404, .. }));
    assert_eq!(backend.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_generate_withTransientErrorThenSuccess_shouldReturnResponse() {
    let (url, backend) = spawn_backend(vec![
        StatusCode::SERVICE_UNAVAILABLE,
        StatusCode::BAD_GATEWAY,
        StatusCode::OK,
    ])
    .await;
    let client = Ollama::with_retries(url, Duration::from_secs(5), 2, 1);

    let response = client.generate(&request()).await.unwrap();

    assert_eq!(response.response, "German");
    assert_eq!(backend.hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_generate_withServerErrors_shouldBackOffExponentially() {
    let (url, backend) = spawn_backend(vec![StatusCode::INTERNAL_SERVER_ERROR]).await;
    let client = Ollama::with_retries(url, Duration::from_secs(5), 2, 40);
    let started = Instant::now();

    assert!(client.generate(&request()).await.is_err());

    // 40ms before the second attempt, 80ms before the third
    assert!(started.elapsed() >= Duration::from_millis(120));
    assert_eq!(backend.hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_generate_withRefusedConnection_shouldRetryWithBackoff() {
    // Bind and drop a listener to get a port nothing is listening on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Ollama::with_retries(format!("http://{}", addr), Duration::from_secs(5), 2, 40);
    let started = Instant::now();

    let error = client.generate(&request()).await.unwrap_err();

    assert!(error.is_transient());
    assert!(started.elapsed() >= Duration::from_millis(120));
}

#[tokio::test]
async fn test_generate_withRefusedConnectionAndNoRetries_shouldFailFast() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Ollama::with_retries(format!("http://{}", addr), Duration::from_secs(5), 0, 1000);
    let started = Instant::now();

    assert!(client.generate(&request()).await.is_err());
    assert!(started.elapsed() < Duration::from_millis(1000));
}
