use std::time::Duration;

use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;

use vitrine::application::ports::{Scraper, ScraperError};
use vitrine::infrastructure::scraping::FirecrawlClient;

use crate::helpers::start_mock_server;

fn canned(status: u16, body: &'static str) -> Router {
    Router::new().route(
        "/v1/scrape",
        post(move || async move {
            let status = StatusCode::from_u16(status).unwrap();
            (status, [("content-type", "application/json")], body).into_response()
        }),
    )
}

fn client(base_url: &str) -> FirecrawlClient {
    FirecrawlClient::new(base_url, "fc-test-key".to_string(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn given_successful_scrape_when_calling_provider_then_returns_normalized_content() {
    let app = Router::new().route(
        "/v1/scrape",
        post(
            |headers: HeaderMap, axum::Json(body): axum::Json<serde_json::Value>| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer fc-test-key");
                if !authorized || body["url"] != "https://shop.example/lamp" {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                axum::Json(serde_json::json!({
                    "success": true,
                    "data": {
                        "markdown": "# Arc Lamp\n$129",
                        "html": "<h1>Arc Lamp</h1>",
                        "metadata": {"title": "Arc Lamp", "statusCode": 200}
                    }
                }))
                .into_response()
            },
        ),
    );
    let (base_url, shutdown_tx) = start_mock_server(app).await;

    let content = client(&base_url)
        .scrape("https://shop.example/lamp")
        .await
        .unwrap();

    assert_eq!(content.source_url, "https://shop.example/lamp");
    assert_eq!(content.markdown.as_deref(), Some("# Arc Lamp\n$129"));
    assert_eq!(content.html.as_deref(), Some("<h1>Arc Lamp</h1>"));
    assert_eq!(content.metadata["title"], "Arc Lamp");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_provider_reports_failure_when_scraping_then_returns_invalid_response() {
    let (base_url, shutdown_tx) = start_mock_server(canned(
        200,
        r#"{"success": false, "error": "Blocked by robots.txt"}"#,
    ))
    .await;

    let result = client(&base_url).scrape("https://shop.example/lamp").await;

    match result {
        Err(ScraperError::InvalidResponse(msg)) => assert!(msg.contains("robots")),
        other => panic!("unexpected result: {:?}", other.map(|c| c.source_url)),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_response_without_content_when_scraping_then_returns_invalid_response() {
    let (base_url, shutdown_tx) = start_mock_server(canned(
        200,
        r#"{"success": true, "data": {"markdown": "", "metadata": {}}}"#,
    ))
    .await;

    let result = client(&base_url).scrape("https://shop.example/lamp").await;

    assert!(matches!(result, Err(ScraperError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_error_status_when_scraping_then_returns_api_error_with_redacted_body() {
    let (base_url, shutdown_tx) = start_mock_server(canned(
        401,
        r#"{"error": "Invalid token: Bearer fc-test-key"}"#,
    ))
    .await;

    let result = client(&base_url).scrape("https://shop.example/lamp").await;

    match result {
        Err(ScraperError::ApiRequestFailed(msg)) => {
            assert!(msg.contains("401"));
            assert!(!msg.contains("fc-test-key"));
        }
        other => panic!("unexpected result: {:?}", other.map(|c| c.source_url)),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_throttling_status_when_scraping_then_returns_rate_limited() {
    let (base_url, shutdown_tx) = start_mock_server(canned(429, r#"{"error": "slow down"}"#)).await;

    let result = client(&base_url).scrape("https://shop.example/lamp").await;

    assert!(matches!(result, Err(ScraperError::RateLimited)));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_slow_provider_when_scraping_then_times_out() {
    let app = Router::new().route(
        "/v1/scrape",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            StatusCode::OK
        }),
    );
    let (base_url, shutdown_tx) = start_mock_server(app).await;
    let client = FirecrawlClient::new(
        &base_url,
        "fc-test-key".to_string(),
        Duration::from_millis(100),
    )
    .unwrap();

    let result = client.scrape("https://shop.example/lamp").await;

    assert!(matches!(result, Err(ScraperError::Timeout)));
    shutdown_tx.send(()).ok();
}
