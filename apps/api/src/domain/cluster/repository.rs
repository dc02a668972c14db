use super::entity::ClusterGroup;
use crate::domain::shared::{errors::DomainError, urgency::Urgency};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterRepository: Send + Sync {
    /// Every stored cluster, in storage (creation) order.
    async fn find_all(&self) -> Result<Vec<ClusterGroup>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ClusterGroup>, DomainError>;
    /// Opens a cluster with `problem_count = 1` and `urgency = normal`.
    async fn create(&self, keywords: &[String]) -> Result<ClusterGroup, DomainError>;
    /// Writes the recounted totals onto the cluster and fans the same
    /// count/urgency out to every unsolved member, as one unit of work.
    async fn apply_active_count(
        &self,
        cluster_id: Uuid,
        active_count: i64,
        urgency: Urgency,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}
