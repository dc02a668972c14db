use super::abuse_log::{AbuseLog, NewAbuseLog};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;

/// Append-only store; there is deliberately no update or delete.
#[async_trait]
pub trait AbuseLogRepository: Send + Sync {
    async fn create(&self, log: &NewAbuseLog) -> Result<AbuseLog, DomainError>;
    /// Newest first.
    async fn find_all(&self) -> Result<Vec<AbuseLog>, DomainError>;
    async fn count(&self) -> Result<i64, DomainError>;
}
