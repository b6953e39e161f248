//! Test utilities for integration tests
#![allow(dead_code)]
use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::{Router, body::Body, http::Request, response::Response};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use concierge::api::AppState;
use concierge::api::app;
use concierge::core::{AppConfig, persona_message};

pub const CONTACT_EMAIL: &str = "hello@example.com";
pub const INTAKE_PATH: &str = "/f/test";

pub fn test_config(llm_url: &str, intake_url: &str) -> AppConfig {
    AppConfig {
        llm_api_hostname: llm_url.to_string(),
        llm_api_key: String::from("test-api-key"),
        llm_model: String::from("llama-3.3-70b-versatile"),
        llm_temperature: 0.65,
        llm_max_tokens: 512,
        llm_timeout_secs: 5,
        session_idle_secs: 1800,
        intake_url: intake_url.to_string(),
        contact_email: CONTACT_EMAIL.to_string(),
        owner_name: String::from("Jordan"),
        site_name: String::from("jordan.example"),
        system_message: persona_message("Jordan", "jordan.example").unwrap(),
    }
}

/// Creates a test application router that talks to the given mock
/// servers for completions and form intake.
pub fn test_app(llm: &mockito::ServerGuard, intake: &mockito::ServerGuard) -> Router {
    test_app_with_state(llm, intake).0
}

/// Like `test_app` but also hands back the shared state so tests can
/// inspect or age the session store.
pub fn test_app_with_state(
    llm: &mockito::ServerGuard,
    intake: &mockito::ServerGuard,
) -> (Router, Arc<RwLock<AppState>>) {
    let intake_url = format!("{}{}", intake.url(), INTAKE_PATH);
    let app_state = AppState::new(test_config(&llm.url(), &intake_url));
    let shared_state = Arc::new(RwLock::new(app_state));
    (app(Arc::clone(&shared_state)), shared_state)
}

/// A successful chat completion response containing `content`.
pub fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1694268190,
        "model": "llama-3.3-70b-versatile",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content
            },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    send(
        app,
        Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// Open a chat session and return its ID.
pub async fn open_session(app: &Router) -> String {
    let response = send(
        app,
        Request::builder()
            .uri("/api/chat")
            .method("POST")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let json = body_to_json(response.into_body()).await;
    json["session_id"].as_str().unwrap().to_string()
}

/// Wait for a mock that is hit from a background task.
pub async fn wait_until_matched(mock: &mockito::Mock) {
    for _ in 0..100 {
        if mock.matched_async().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
