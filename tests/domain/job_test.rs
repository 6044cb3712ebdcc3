use vitrine::domain::{Job, JobId, JobStatus};

#[test]
fn given_url_when_creating_job_then_status_is_pending_with_identifier() {
    let job = Job::new("http://x".to_string());

    assert_eq!(job.status, JobStatus::Pending);
    assert!(!job.id.to_string().is_empty());
    assert_eq!(job.url, "http://x");
    assert!(job.raw_content.is_none());
    assert!(job.structured_data.is_none());
    assert!(job.error_message.is_none());
    assert_eq!(job.created_at, job.updated_at);
}

#[test]
fn given_two_jobs_when_created_then_ids_are_unique() {
    let first = Job::new("http://a".to_string());
    let second = Job::new("http://a".to_string());
    assert_ne!(first.id, second.id);
}

#[test]
fn given_job_when_summarized_then_carries_listing_fields() {
    let job = Job::new("https://shop.example/lamp".to_string());
    let summary = job.summary();

    assert_eq!(summary.id, job.id);
    assert_eq!(summary.url, job.url);
    assert_eq!(summary.status, job.status);
    assert_eq!(summary.created_at, job.created_at);
}

#[test]
fn given_job_id_string_when_parsed_then_round_trips_through_display() {
    let id = JobId::new();
    let parsed: JobId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn given_malformed_job_id_when_parsed_then_returns_error() {
    let result = "not-a-uuid".parse::<JobId>();
    assert!(result.unwrap_err().contains("Invalid job ID"));
}
