use crate::domain::{
    shared::errors::DomainError,
    user::{
        entity::{NewUser, Role, User, UserStats},
        repository::UserRepository,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, password_hash, role, roll_number, user_type, \
                            banned_until, created_at";

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxUserRepository with connection pool");
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let sql = format!(
            "INSERT INTO users (id, username, email, password_hash, role, roll_number, user_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::now_v7())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(&user.roll_number)
            .bind(user.user_type)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", email).await
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn update_ban(
        &self,
        id: Uuid,
        banned_until: Option<DateTime<Utc>>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET banned_until = $2 WHERE id = $1")
            .bind(id)
            .bind(banned_until)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_role(&self, id: Uuid, role: Role) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn stats(&self, now: DateTime<Utc>) -> Result<UserStats, DomainError> {
        let (total, banned): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE banned_until > $1) FROM users",
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(UserStats { total, banned })
    }
}
