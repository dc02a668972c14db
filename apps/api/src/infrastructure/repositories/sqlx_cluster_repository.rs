use crate::domain::{
    cluster::{entity::ClusterGroup, repository::ClusterRepository},
    shared::{errors::DomainError, urgency::Urgency},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

pub struct SqlxClusterRepository {
    pub pool: PgPool,
}

impl SqlxClusterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClusterRepository for SqlxClusterRepository {
    async fn find_all(&self) -> Result<Vec<ClusterGroup>, DomainError> {
        // v7 ids sort by creation time
        let clusters = sqlx::query_as::<_, ClusterGroup>(
            "SELECT id, keywords, problem_count, urgency, last_updated \
             FROM cluster_groups ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(clusters)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ClusterGroup>, DomainError> {
        let cluster = sqlx::query_as::<_, ClusterGroup>(
            "SELECT id, keywords, problem_count, urgency, last_updated \
             FROM cluster_groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(cluster)
    }

    #[instrument(skip(self))]
    async fn create(&self, keywords: &[String]) -> Result<ClusterGroup, DomainError> {
        let cluster = sqlx::query_as::<_, ClusterGroup>(
            "INSERT INTO cluster_groups (id, keywords, problem_count, urgency) \
             VALUES ($1, $2, 1, $3) \
             RETURNING id, keywords, problem_count, urgency, last_updated",
        )
        .bind(Uuid::now_v7())
        .bind(keywords)
        .bind(Urgency::Normal)
        .fetch_one(&self.pool)
        .await?;
        debug!(cluster_id = %cluster.id, "Cluster opened");
        Ok(cluster)
    }

    #[instrument(skip(self))]
    async fn apply_active_count(
        &self,
        cluster_id: Uuid,
        active_count: i64,
        urgency: Urgency,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let count = i32::try_from(active_count)
            .map_err(|_| DomainError::InfrastructureError("Cluster count overflow".into()))?;

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "UPDATE cluster_groups SET problem_count = $2, urgency = $3, last_updated = $4 \
             WHERE id = $1",
        )
        .bind(cluster_id)
        .bind(count)
        .bind(urgency)
        .bind(at)
        .execute(&mut *tx)
        .await?;
        let fanned = sqlx::query(
            "UPDATE complaints SET similar_complaints_count = $2, urgency = $3 \
             WHERE cluster_id = $1 AND solved = FALSE",
        )
        .bind(cluster_id)
        .bind(count)
        .bind(urgency)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        debug!(members = fanned.rows_affected(), "Cluster totals fanned out");
        Ok(())
    }
}
