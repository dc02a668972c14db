use crate::domain::{
    moderation::{
        abuse_log::{AbuseLog, NewAbuseLog},
        repository::AbuseLogRepository,
    },
    shared::errors::DomainError,
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

pub struct SqlxAbuseLogRepository {
    pub pool: PgPool,
}

impl SqlxAbuseLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AbuseLogRepository for SqlxAbuseLogRepository {
    #[instrument(skip(self, log), fields(user_id = %log.user_id))]
    async fn create(&self, log: &NewAbuseLog) -> Result<AbuseLog, DomainError> {
        let created = sqlx::query_as::<_, AbuseLog>(
            "INSERT INTO abuse_logs (id, user_id, username, flagged_text, detected_words) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, user_id, username, flagged_text, detected_words, created_at",
        )
        .bind(Uuid::now_v7())
        .bind(log.user_id)
        .bind(&log.username)
        .bind(&log.flagged_text)
        .bind(&log.detected_words)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<AbuseLog>, DomainError> {
        let logs = sqlx::query_as::<_, AbuseLog>(
            "SELECT id, user_id, username, flagged_text, detected_words, created_at \
             FROM abuse_logs ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    async fn count(&self) -> Result<i64, DomainError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM abuse_logs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
