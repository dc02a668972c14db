use super::dto::{AdminDashboard, AdminStats};
use crate::{
    application::clustering::service::ClusterEngine,
    domain::{
        complaint::repository::ComplaintRepository,
        moderation::repository::AbuseLogRepository,
        shared::errors::DomainError,
        user::{entity::Role, repository::UserRepository},
    },
    infrastructure::security::abuse_detector::{MAX_BAN_HOURS, ban_expiration},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub const DEFAULT_ADMIN_BAN_HOURS: i64 = 48;

pub struct AdminUseCase {
    users: Arc<dyn UserRepository>,
    complaints: Arc<dyn ComplaintRepository>,
    abuse_logs: Arc<dyn AbuseLogRepository>,
    engine: ClusterEngine,
}

impl AdminUseCase {
    pub fn new(
        users: Arc<dyn UserRepository>,
        complaints: Arc<dyn ComplaintRepository>,
        abuse_logs: Arc<dyn AbuseLogRepository>,
        engine: ClusterEngine,
    ) -> Self {
        Self {
            users,
            complaints,
            abuse_logs,
            engine,
        }
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<AdminDashboard, DomainError> {
        let stats = AdminStats {
            complaints: self.complaints.stats().await?,
            users: self.users.stats(Utc::now()).await?,
            abuse_logs: self.abuse_logs.count().await?,
        };
        Ok(AdminDashboard {
            stats,
            complaints: self.complaints.find_all().await?,
            users: self
                .users
                .find_all()
                .await?
                .into_iter()
                .map(Into::into)
                .collect(),
            abuse_logs: self.abuse_logs.find_all().await?,
        })
    }

    #[instrument(skip(self))]
    pub async fn set_role(&self, user_id: Uuid, role: &str) -> Result<Role, DomainError> {
        let role: Role = role
            .parse()
            .map_err(|_| DomainError::ValidationError("Invalid role".into()))?;
        self.users.update_role(user_id, role).await?;
        info!(%user_id, role = role.as_str(), "Role updated");
        Ok(role)
    }

    /// Bans a user for `hours` (48 when absent or not positive) and returns
    /// the expiry.
    #[instrument(skip(self))]
    pub async fn ban(
        &self,
        user_id: Uuid,
        hours: Option<i64>,
    ) -> Result<DateTime<Utc>, DomainError> {
        let hours = hours
            .filter(|h| *h > 0)
            .unwrap_or(DEFAULT_ADMIN_BAN_HOURS);
        if hours > MAX_BAN_HOURS {
            return Err(DomainError::ValidationError(
                "Ban length cannot exceed one year".to_string(),
            ));
        }
        let banned_until = ban_expiration(Utc::now(), hours)?;
        self.users.update_ban(user_id, Some(banned_until)).await?;
        info!(%user_id, hours, "User banned");
        Ok(banned_until)
    }

    #[instrument(skip(self))]
    pub async fn unban(&self, user_id: Uuid) -> Result<(), DomainError> {
        self.users.update_ban(user_id, None).await?;
        info!(%user_id, "User unbanned");
        Ok(())
    }

    pub async fn recalculate_clusters(&self) -> Result<usize, DomainError> {
        self.engine.recalculate_urgencies().await
    }
}
