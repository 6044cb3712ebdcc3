use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgQueryResult, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobStatus, JobSummary, Product, RawContent};

/// Jobs stored in the `scrape_jobs` table, with scraped and structured payloads kept
/// as JSONB documents.
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn expect_updated(
    id: JobId,
    result: Result<PgQueryResult, sqlx::Error>,
) -> Result<(), RepositoryError> {
    if result.map_err(query_failed)?.rows_affected() == 0 {
        return Err(RepositoryError::NotFound(id));
    }
    Ok(())
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}

fn parse_status(raw: &str) -> Result<JobStatus, RepositoryError> {
    raw.parse::<JobStatus>()
        .map_err(RepositoryError::CorruptRecord)
}

fn job_from_row(row: &PgRow) -> Result<Job, RepositoryError> {
    let id: Uuid = row.try_get("id").map_err(query_failed)?;
    let status: String = row.try_get("status").map_err(query_failed)?;
    let raw_content: Option<serde_json::Value> =
        row.try_get("raw_content").map_err(query_failed)?;
    let structured_data: Option<serde_json::Value> =
        row.try_get("structured_data").map_err(query_failed)?;

    let raw_content = raw_content
        .map(serde_json::from_value::<RawContent>)
        .transpose()
        .map_err(|e| RepositoryError::CorruptRecord(format!("raw_content: {}", e)))?;
    let structured_data = structured_data
        .map(serde_json::from_value::<Product>)
        .transpose()
        .map_err(|e| RepositoryError::CorruptRecord(format!("structured_data: {}", e)))?;

    Ok(Job {
        id: JobId::from_uuid(id),
        url: row.try_get("url").map_err(query_failed)?,
        status: parse_status(&status)?,
        raw_content,
        structured_data,
        error_message: row.try_get("error_message").map_err(query_failed)?,
        created_at: row.try_get("created_at").map_err(query_failed)?,
        updated_at: row.try_get("updated_at").map_err(query_failed)?,
    })
}

fn summary_from_row(row: &PgRow) -> Result<JobSummary, RepositoryError> {
    let id: Uuid = row.try_get("id").map_err(query_failed)?;
    let status: String = row.try_get("status").map_err(query_failed)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(query_failed)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(query_failed)?;

    Ok(JobSummary {
        id: JobId::from_uuid(id),
        url: row.try_get("url").map_err(query_failed)?,
        status: parse_status(&status)?,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl JobRepository for PgJobRepository {
    #[instrument(skip(self))]
    async fn create(&self, url: &str) -> Result<Job, RepositoryError> {
        let job = Job::new(url.to_string());

        sqlx::query(
            r#"
            INSERT INTO scrape_jobs (id, url, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(&job.url)
        .bind(job.status.as_str())
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(job)
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, url, status, raw_content, structured_data, error_message,
                   created_at, updated_at
            FROM scrape_jobs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.as_ref().map(job_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        status: Option<JobStatus>,
        limit: usize,
    ) -> Result<Vec<JobSummary>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query(
            r#"
            SELECT id, url, status, created_at, updated_at
            FROM scrape_jobs
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY seq ASC
            LIMIT $2
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.iter().map(summary_from_row).collect()
    }

    #[instrument(skip(self, content), fields(job_id = %id))]
    async fn set_raw_content(
        &self,
        id: JobId,
        content: &RawContent,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE scrape_jobs SET raw_content = $1, updated_at = $2 WHERE id = $3",
        )
        .bind(Json(content))
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await;

        expect_updated(id, result)
    }

    #[instrument(skip(self, data), fields(job_id = %id))]
    async fn set_structured_data(
        &self,
        id: JobId,
        data: &Product,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE scrape_jobs SET structured_data = $1, updated_at = $2 WHERE id = $3",
        )
        .bind(Json(data))
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await;

        expect_updated(id, result)
    }

    #[instrument(skip(self, error_message), fields(job_id = %id, status = %status))]
    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE scrape_jobs
            SET status = $1, error_message = $2, updated_at = $3
            WHERE id = $4
            "#,
        )
        .bind(status.as_str())
        .bind(error_message)
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await;

        expect_updated(id, result)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }
}
