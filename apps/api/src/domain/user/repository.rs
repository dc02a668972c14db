use super::entity::{NewUser, Role, User, UserStats};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DomainError::Conflict` when the username, email or roll
    /// number is already taken.
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    /// Newest first.
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;
    async fn update_ban(
        &self,
        id: Uuid,
        banned_until: Option<DateTime<Utc>>,
    ) -> Result<(), DomainError>;
    async fn update_role(&self, id: Uuid, role: Role) -> Result<(), DomainError>;
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError>;
    async fn stats(&self, now: DateTime<Utc>) -> Result<UserStats, DomainError>;
}
