// ABOUTME: HTTP-level tests for the Gemini client against a local stand-in endpoint
// ABOUTME: Verifies request shape, reply extraction, and status-to-error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use common::{init_test_logging, jpeg_bytes};
use meal_lens::config::GeminiConfig;
use meal_lens::errors::ErrorCode;
use meal_lens::llm::{GeminiClient, ImagePayload, InferenceClient, InferenceRequest};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Received {
    path: String,
    key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct StandIn {
    status: StatusCode,
    reply: String,
    received: Arc<Mutex<Vec<Received>>>,
}

async fn generate(
    State(state): State<StandIn>,
    Path(call): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    state.received.lock().unwrap().push(Received {
        path: call,
        key: query.get("key").cloned(),
        body,
    });
    (state.status, state.reply.clone())
}

/// Serve one canned reply; returns the client and what the server saw
async fn stand_in(status: StatusCode, reply: &str) -> (GeminiClient, Arc<Mutex<Vec<Received>>>) {
    init_test_logging();
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = StandIn {
        status,
        reply: reply.to_owned(),
        received: received.clone(),
    };
    let app = Router::new()
        .route("/models/:call", post(generate))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = GeminiConfig {
        api_base: format!("http://{addr}/"),
        request_timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(5),
        ..GeminiConfig::default()
    };
    (GeminiClient::new(&config).unwrap(), received)
}

fn envelope(text: &str) -> String {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_multimodal_request_round_trip() {
    let (client, received) = stand_in(
        StatusCode::OK,
        &envelope("```json\n[{\"box_2d\": [0, 0, 10, 10], \"label\": \"egg\"}]\n```"),
    )
    .await;
    let request = InferenceRequest::text("segment this", "secret-key", "gemini-test")
        .with_image(ImagePayload::from_bytes(jpeg_bytes()));

    let text = client.generate_content(&request).await.unwrap();

    assert_eq!(text, "[{\"box_2d\": [0, 0, 10, 10], \"label\": \"egg\"}]");
    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].path, "gemini-test:generateContent");
    assert_eq!(received[0].key.as_deref(), Some("secret-key"));
    let parts = &received[0].body["contents"][0]["parts"];
    assert_eq!(parts[0]["inline_data"]["mime_type"], "image/jpeg");
    assert!(parts[0]["inline_data"]["data"].as_str().unwrap().starts_with("/9j/"));
    assert_eq!(parts[1]["text"], "segment this");
}

#[tokio::test]
async fn test_text_only_request_has_single_part() {
    let (client, received) = stand_in(StatusCode::OK, &envelope("Drink some water.")).await;
    let request = InferenceRequest::text("advise", "k", "gemini-test");

    let text = client.generate_content(&request).await.unwrap();

    assert_eq!(text, "Drink some water.");
    let received = received.lock().unwrap();
    let parts = received[0].body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 1);
}

#[tokio::test]
async fn test_key_with_reserved_characters_arrives_intact() {
    let (client, received) = stand_in(StatusCode::OK, &envelope("ok")).await;
    let request = InferenceRequest::text("p", "AIza+k/e y&x=1#frag", "gemini-test");

    client.generate_content(&request).await.unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].key.as_deref(), Some("AIza+k/e y&x=1#frag"));
    assert_eq!(received[0].path, "gemini-test:generateContent");
}

#[tokio::test]
async fn test_quota_exhaustion_is_rate_limited() {
    let body = json!({
        "error": {
            "code": 429,
            "message": "You exceeded your current quota. Please retry in 12.2s.",
            "status": "RESOURCE_EXHAUSTED"
        }
    })
    .to_string();
    let (client, _) = stand_in(StatusCode::TOO_MANY_REQUESTS, &body).await;

    let err = client
        .generate_content(&InferenceRequest::text("p", "k", "gemini-test"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalRateLimited);
    assert_eq!(
        err.message,
        "AI service quota exceeded. Please try again in 13 seconds."
    );
}

#[tokio::test]
async fn test_rejected_key_is_auth_failure() {
    let body = json!({"error": {"code": 403, "message": "API key not valid."}}).to_string();
    let (client, _) = stand_in(StatusCode::FORBIDDEN, &body).await;

    let err = client
        .generate_content(&InferenceRequest::text("p", "bad", "gemini-test"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalAuthFailed);
    assert!(err.message.contains("API key not valid."));
}

#[tokio::test]
async fn test_server_error_is_external_service_error() {
    let (client, _) = stand_in(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").await;

    let err = client
        .generate_content(&InferenceRequest::text("p", "k", "gemini-test"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceError);
    assert!(err.message.contains("500"));
}

#[tokio::test]
async fn test_reply_without_text_is_error() {
    let (client, _) = stand_in(StatusCode::OK, r#"{"candidates": []}"#).await;

    let err = client
        .generate_content(&InferenceRequest::text("p", "k", "gemini-test"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceError);
}

#[tokio::test]
async fn test_blank_key_sends_nothing() {
    let (client, received) = stand_in(StatusCode::OK, &envelope("unused")).await;

    let err = client
        .generate_content(&InferenceRequest::text("p", "  ", "gemini-test"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ConfigMissing);
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_unavailable() {
    init_test_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let config = GeminiConfig {
        api_base: format!("http://{addr}"),
        ..GeminiConfig::default()
    };
    let client = GeminiClient::new(&config).unwrap();

    let err = client
        .generate_content(&InferenceRequest::text("p", "k", "gemini-test"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    assert!(!err.message.contains("key=k"));
}
