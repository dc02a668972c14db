use super::entity::{Complaint, ComplaintStats, NewComplaint};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    async fn create(&self, complaint: &NewComplaint) -> Result<Complaint, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Complaint>, DomainError>;
    /// All complaints, newest first.
    async fn find_all(&self) -> Result<Vec<Complaint>, DomainError>;
    /// Ordered by similar count, then likes, then recency.
    async fn leaderboard(&self, limit: i64, offset: i64) -> Result<Vec<Complaint>, DomainError>;
    /// Persists the editable fields: text, status, resolution, urgency and
    /// similar count. Vote counters are owned by the social repository.
    async fn update(&self, complaint: &Complaint) -> Result<Complaint, DomainError>;
    /// Deletes the complaint with its likes and reactions, returning the
    /// removed row.
    async fn delete(&self, id: Uuid) -> Result<Option<Complaint>, DomainError>;
    async fn delete_many(&self, ids: &[Uuid]) -> Result<Vec<Complaint>, DomainError>;
    async fn count_active_in_cluster(&self, cluster_id: Uuid) -> Result<i64, DomainError>;
    async fn stats(&self) -> Result<ComplaintStats, DomainError>;
}
