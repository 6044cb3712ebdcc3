use std::sync::Arc;
use std::time::Duration;

use vitrine::application::services::{
    RateGate, RateGateConfig, StructuringError, StructuringService,
};
use vitrine::domain::{JobId, RawContent};
use vitrine::infrastructure::llm::MockLlmClient;

use crate::helpers::FailingLlmClient;

fn content(markdown: &str) -> RawContent {
    RawContent::new(
        "https://shop.example/lamp".to_string(),
        Some(markdown.to_string()),
        None,
        serde_json::json!({ "title": "Lamp" }),
    )
}

fn gate(capacity: u64) -> Arc<RateGate> {
    Arc::new(RateGate::new(RateGateConfig {
        capacity,
        window: Duration::from_secs(60),
        chars_per_token: 4,
    }))
}

#[tokio::test]
async fn given_fenced_json_reply_when_structuring_then_returns_product() {
    let llm = Arc::new(MockLlmClient::new(
        "Here you go:\n```json\n{\"name\": \"Arc Lamp\", \"price\": 99.0, \"sku\": \"ARC\"}\n```",
    ));
    let service = StructuringService::new(llm.clone(), gate(36_000));
    let job_id = JobId::new();

    let product = service
        .structure(job_id, &content("# Arc Lamp"))
        .await
        .unwrap();

    assert_eq!(product.name, "Arc Lamp");
    assert_eq!(product.price, 99.0);
    assert_eq!(product.id, job_id.to_string());
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn given_prose_reply_when_structuring_then_reports_malformed_output() {
    let llm = Arc::new(MockLlmClient::new("I could not find a product on this page."));
    let service = StructuringService::new(llm, gate(36_000));

    let result = service.structure(JobId::new(), &content("# Nothing")).await;

    assert!(matches!(result, Err(StructuringError::MalformedOutput(_))));
}

#[tokio::test]
async fn given_reply_without_name_when_structuring_then_reports_invalid_product() {
    let llm = Arc::new(MockLlmClient::new(r#"{"price": 10}"#));
    let service = StructuringService::new(llm, gate(36_000));

    let result = service.structure(JobId::new(), &content("# Mystery")).await;

    assert!(matches!(result, Err(StructuringError::Invalid(_))));
}

#[tokio::test]
async fn given_payload_larger_than_capacity_when_structuring_then_rate_limited_without_calling_llm()
{
    let llm = Arc::new(MockLlmClient::default());
    let service = StructuringService::new(llm.clone(), gate(10));

    let result = service
        .structure(JobId::new(), &content(&"x".repeat(4_000)))
        .await;

    assert!(matches!(result, Err(StructuringError::RateLimited { .. })));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn given_drained_gate_when_structuring_then_waits_for_refill_and_succeeds() {
    let llm = Arc::new(MockLlmClient::default());
    let rate_gate = gate(5_000);
    assert!(rate_gate.try_acquire(5_000));
    let service = StructuringService::new(llm.clone(), Arc::clone(&rate_gate));

    let started = tokio::time::Instant::now();
    let result = service.structure(JobId::new(), &content("# Mock Lamp")).await;

    assert!(result.is_ok(), "{:?}", result.err());
    assert!(started.elapsed() > Duration::ZERO);
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn given_two_callers_on_drained_gate_when_both_wait_then_only_one_acquires() {
    let llm = Arc::new(MockLlmClient::default());
    let rate_gate = gate(5_000);
    assert!(rate_gate.try_acquire(5_000));
    let service = StructuringService::new(llm.clone(), rate_gate);
    let page = content("# Mock Lamp");

    let (first, second) = tokio::join!(
        service.structure(JobId::new(), &page),
        service.structure(JobId::new(), &page),
    );

    let outcomes = [first, second];
    let succeeded = outcomes.iter().filter(|r| r.is_ok()).count();
    let throttled = outcomes
        .iter()
        .filter(|r| {
            matches!(r, Err(StructuringError::RateLimited { reason, .. })
                if reason == "token budget exhausted")
        })
        .count();
    assert_eq!(succeeded, 1);
    assert_eq!(throttled, 1);
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn given_reply_with_braces_after_json_when_structuring_then_reads_first_object() {
    let llm = Arc::new(MockLlmClient::new(
        "{\"name\": \"Arc Lamp\", \"price\": \"$99\"}\nNote: fields like {sku} were not on the page.",
    ));
    let service = StructuringService::new(llm, gate(36_000));

    let product = service
        .structure(JobId::new(), &content("# Arc Lamp"))
        .await
        .unwrap();

    assert_eq!(product.name, "Arc Lamp");
    assert_eq!(product.price, 99.0);
}

#[tokio::test]
async fn given_provider_throttling_when_structuring_then_reports_rate_limited() {
    let service = StructuringService::new(
        Arc::new(FailingLlmClient { rate_limited: true }),
        gate(36_000),
    );

    let result = service.structure(JobId::new(), &content("# Lamp")).await;

    assert!(matches!(result, Err(StructuringError::RateLimited { .. })));
}

#[tokio::test]
async fn given_provider_failure_when_structuring_then_reports_completion_error() {
    let service = StructuringService::new(
        Arc::new(FailingLlmClient {
            rate_limited: false,
        }),
        gate(36_000),
    );

    let result = service.structure(JobId::new(), &content("# Lamp")).await;

    assert!(matches!(result, Err(StructuringError::Completion(_))));
}

#[tokio::test]
async fn given_content_without_body_when_structuring_then_fails_before_calling_llm() {
    let llm = Arc::new(MockLlmClient::default());
    let service = StructuringService::new(llm.clone(), gate(36_000));
    let empty = RawContent::new(
        "https://shop.example".to_string(),
        None,
        None,
        serde_json::Value::Null,
    );

    let result = service.structure(JobId::new(), &empty).await;

    assert!(matches!(result, Err(StructuringError::EmptyContent)));
    assert_eq!(llm.call_count(), 0);
}
