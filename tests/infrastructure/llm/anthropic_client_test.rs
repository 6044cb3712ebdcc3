use std::time::Duration;

use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;

use vitrine::application::ports::{LlmClient, LlmClientError};
use vitrine::infrastructure::llm::AnthropicClient;

use crate::helpers::start_mock_server;

fn canned(status: u16, body: &'static str) -> Router {
    Router::new().route(
        "/v1/messages",
        post(move || async move {
            let status = StatusCode::from_u16(status).unwrap();
            (status, [("content-type", "application/json")], body).into_response()
        }),
    )
}

fn client(base_url: &str) -> AnthropicClient {
    AnthropicClient::new(
        base_url,
        "sk-ant-test".to_string(),
        "claude-test".to_string(),
        512,
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn given_text_blocks_when_completing_then_returns_joined_text() {
    let app = Router::new().route(
        "/v1/messages",
        post(
            |headers: HeaderMap, axum::Json(body): axum::Json<serde_json::Value>| async move {
                let key_ok = headers.get("x-api-key").and_then(|v| v.to_str().ok())
                    == Some("sk-ant-test");
                let version_ok = headers.get("anthropic-version").is_some();
                if !key_ok || !version_ok || body["model"] != "claude-test" {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                assert_eq!(body["system"], "extract");
                assert_eq!(body["messages"][0]["role"], "user");
                assert_eq!(body["messages"][0]["content"], "page");
                axum::Json(serde_json::json!({
                    "content": [
                        {"type": "text", "text": "{\"name\":"},
                        {"type": "tool_use", "id": "x"},
                        {"type": "text", "text": " \"Lamp\"}"}
                    ],
                    "stop_reason": "end_turn"
                }))
                .into_response()
            },
        ),
    );
    let (base_url, shutdown_tx) = start_mock_server(app).await;

    let reply = client(&base_url).complete("extract", "page").await.unwrap();

    assert_eq!(reply, "{\"name\": \"Lamp\"}");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_throttling_status_when_completing_then_returns_rate_limited() {
    let (base_url, shutdown_tx) =
        start_mock_server(canned(429, r#"{"type": "error", "error": {"type": "rate_limit_error"}}"#))
            .await;

    let result = client(&base_url).complete("extract", "page").await;

    assert!(matches!(result, Err(LlmClientError::RateLimited)));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_server_error_when_completing_then_returns_api_error() {
    let (base_url, shutdown_tx) =
        start_mock_server(canned(500, r#"{"type": "error", "error": {"type": "api_error"}}"#))
            .await;

    let result = client(&base_url).complete("extract", "page").await;

    match result {
        Err(LlmClientError::ApiRequestFailed(msg)) => assert!(msg.contains("500")),
        other => panic!("unexpected result: {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_reply_without_text_when_completing_then_returns_invalid_response() {
    let (base_url, shutdown_tx) =
        start_mock_server(canned(200, r#"{"content": [], "stop_reason": "end_turn"}"#)).await;

    let result = client(&base_url).complete("extract", "page").await;

    assert!(matches!(result, Err(LlmClientError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_non_json_body_when_completing_then_returns_invalid_response() {
    let (base_url, shutdown_tx) = start_mock_server(canned(200, "<html>gateway</html>")).await;

    let result = client(&base_url).complete("extract", "page").await;

    assert!(matches!(result, Err(LlmClientError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}
