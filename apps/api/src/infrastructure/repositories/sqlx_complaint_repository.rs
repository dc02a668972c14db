use crate::domain::{
    complaint::{
        entity::{Complaint, ComplaintStats, NewComplaint},
        repository::ComplaintRepository,
    },
    shared::errors::DomainError,
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

const COMPLAINT_COLUMNS: &str = "id, user_id, username, original_text, summary, severity, \
                                 keywords, status, solved, solved_by, solved_at, urgency, \
                                 similar_complaints_count, cluster_id, likes_count, \
                                 dislikes_count, created_at";

pub struct SqlxComplaintRepository {
    pub pool: PgPool,
}

impl SqlxComplaintRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxComplaintRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl ComplaintRepository for SqlxComplaintRepository {
    #[instrument(skip(self, complaint), fields(user_id = %complaint.user_id, cluster_id = ?complaint.cluster_id))]
    async fn create(&self, complaint: &NewComplaint) -> Result<Complaint, DomainError> {
        let sql = format!(
            "INSERT INTO complaints (id, user_id, username, original_text, summary, severity, \
             keywords, cluster_id, similar_complaints_count, urgency) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {COMPLAINT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Complaint>(&sql)
            .bind(Uuid::now_v7())
            .bind(complaint.user_id)
            .bind(&complaint.username)
            .bind(&complaint.original_text)
            .bind(&complaint.summary)
            .bind(complaint.severity)
            .bind(&complaint.keywords)
            .bind(complaint.cluster_id)
            .bind(complaint.similar_complaints_count)
            .bind(complaint.urgency)
            .fetch_one(&self.pool)
            .await?;
        debug!(complaint_id = %created.id, "Complaint stored");
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Complaint>, DomainError> {
        let sql = format!("SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = $1");
        let complaint = sqlx::query_as::<_, Complaint>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(complaint)
    }

    async fn find_all(&self) -> Result<Vec<Complaint>, DomainError> {
        let sql = format!("SELECT {COMPLAINT_COLUMNS} FROM complaints ORDER BY created_at DESC");
        let complaints = sqlx::query_as::<_, Complaint>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(complaints)
    }

    async fn leaderboard(&self, limit: i64, offset: i64) -> Result<Vec<Complaint>, DomainError> {
        let sql = format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints \
             ORDER BY similar_complaints_count DESC, likes_count DESC, created_at DESC \
             LIMIT $1 OFFSET $2"
        );
        let complaints = sqlx::query_as::<_, Complaint>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(complaints)
    }

    #[instrument(skip(self, complaint), fields(complaint_id = %complaint.id))]
    async fn update(&self, complaint: &Complaint) -> Result<Complaint, DomainError> {
        let sql = format!(
            "UPDATE complaints SET original_text = $2, status = $3, solved = $4, solved_by = $5, \
             solved_at = $6, urgency = $7, similar_complaints_count = $8 \
             WHERE id = $1 RETURNING {COMPLAINT_COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&sql)
            .bind(complaint.id)
            .bind(&complaint.original_text)
            .bind(complaint.status)
            .bind(complaint.solved)
            .bind(complaint.solved_by)
            .bind(complaint.solved_at)
            .bind(complaint.urgency)
            .bind(complaint.similar_complaints_count)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Complaint {} not found", complaint.id)))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<Option<Complaint>, DomainError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM likes WHERE complaint_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM reactions WHERE complaint_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let sql = format!("DELETE FROM complaints WHERE id = $1 RETURNING {COMPLAINT_COLUMNS}");
        let deleted = sqlx::query_as::<_, Complaint>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(deleted)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn delete_many(&self, ids: &[Uuid]) -> Result<Vec<Complaint>, DomainError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM likes WHERE complaint_id = ANY($1)")
            .bind(ids)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM reactions WHERE complaint_id = ANY($1)")
            .bind(ids)
            .execute(&mut *tx)
            .await?;
        let sql =
            format!("DELETE FROM complaints WHERE id = ANY($1) RETURNING {COMPLAINT_COLUMNS}");
        let deleted = sqlx::query_as::<_, Complaint>(&sql)
            .bind(ids)
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(deleted)
    }

    async fn count_active_in_cluster(&self, cluster_id: Uuid) -> Result<i64, DomainError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM complaints WHERE cluster_id = $1 AND solved = FALSE",
        )
        .bind(cluster_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn stats(&self) -> Result<ComplaintStats, DomainError> {
        let (total, pending, solved, urgent, critical, emergency): (i64, i64, i64, i64, i64, i64) =
            sqlx::query_as(
                "SELECT COUNT(*), \
                        COUNT(*) FILTER (WHERE status = 'pending'), \
                        COUNT(*) FILTER (WHERE solved), \
                        COUNT(*) FILTER (WHERE urgency = 'urgent'), \
                        COUNT(*) FILTER (WHERE urgency IN ('critical', 'top_priority')), \
                        COUNT(*) FILTER (WHERE urgency = 'emergency') \
                 FROM complaints",
            )
            .fetch_one(&self.pool)
            .await?;
        Ok(ComplaintStats {
            total,
            pending,
            solved,
            urgent,
            critical,
            emergency,
        })
    }
}
