use super::dto::{ChangePasswordRequest, LoginRequest, SignupRequest};
use crate::{
    domain::{
        shared::errors::DomainError,
        user::{
            entity::{NewUser, Role, User, UserType},
            repository::UserRepository,
            value_objects::{Password, RollNumber},
        },
    },
    infrastructure::security::password::{hash_password, verify_password},
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

pub struct AuthUseCase {
    users: Arc<dyn UserRepository>,
}

impl AuthUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Creates a student account. Roll numbers are stored upper-cased.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signup(&self, request: SignupRequest) -> Result<User, DomainError> {
        request.validate()?;

        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();
        let roll_number = match request.roll_number.filter(|r| !r.trim().is_empty()) {
            Some(raw) => Some(RollNumber::new(raw)?.value),
            None => None,
        };

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::Conflict("Username already exists".into()));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".into()));
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        let user = self
            .users
            .create(&NewUser {
                username,
                email,
                password_hash,
                role: Role::Student,
                roll_number,
                user_type: request.user_type,
            })
            .await?;

        info!(user_id = %user.id, "User signed up");
        Ok(user)
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> Result<User, DomainError> {
        request.validate()?;

        let user = self
            .users
            .find_by_username(request.username.trim())
            .await?
            .ok_or(DomainError::Unauthorized)?;
        if !verify_password(&request.password, &user.password_hash) {
            warn!("Failed login attempt");
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        user_id: Uuid,
        request: ChangePasswordRequest,
    ) -> Result<(), DomainError> {
        request.validate()?;
        let new_password = Password::new(request.new_password)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".into()))?;
        if !verify_password(&request.current_password, &user.password_hash) {
            return Err(DomainError::ValidationError(
                "Current password is incorrect".into(),
            ));
        }

        let password_hash = hash_password(&new_password.value)
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        self.users.update_password(user.id, &password_hash).await
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Unauthorized)
    }

    /// Seeds an admin account from a pre-computed bcrypt hash. Does nothing
    /// when the username is already taken.
    pub async fn bootstrap_admin(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, DomainError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Ok(None);
        }
        let admin = self
            .users
            .create(&NewUser {
                username: username.to_string(),
                email: email.to_lowercase(),
                password_hash: password_hash.to_string(),
                role: Role::Admin,
                roll_number: None,
                user_type: UserType::Faculty,
            })
            .await?;
        info!(user_id = %admin.id, "Bootstrap admin created");
        Ok(Some(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::in_memory::InMemoryStore;

    fn signup_request(username: &str, roll: Option<&str>) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            email: format!("{}@campus.edu", username),
            password: "secret1".to_string(),
            roll_number: roll.map(str::to_string),
            user_type: UserType::Student,
        }
    }

    fn auth() -> AuthUseCase {
        AuthUseCase::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn signup_then_login() {
        let auth = auth();
        let user = auth
            .signup(signup_request("priya", Some("24ee12")))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Student);
        assert_eq!(user.roll_number.as_deref(), Some("24EE12"));
        assert_ne!(user.password_hash, "secret1");

        let logged_in = auth
            .login(LoginRequest {
                username: "priya".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let auth = auth();
        auth.signup(signup_request("priya", None)).await.unwrap();
        let err = auth
            .login(LoginRequest {
                username: "priya".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized));
    }

    #[tokio::test]
    async fn bad_roll_number_is_rejected() {
        let err = auth()
            .signup(signup_request("priya", Some("21CS05")))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(m) if m.starts_with("Roll number must be")));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let mut request = signup_request("priya", None);
        request.password = "abc".into();
        let err = auth().signup(request).await.unwrap_err();
        assert!(
            matches!(err, DomainError::ValidationError(m) if m == "Password must be at least 6 characters")
        );
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let auth = auth();
        auth.signup(signup_request("priya", None)).await.unwrap();
        let mut again = signup_request("priya", None);
        again.email = "other@campus.edu".into();
        assert!(matches!(
            auth.signup(again).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn change_password_checks_current() {
        let auth = auth();
        let user = auth.signup(signup_request("priya", None)).await.unwrap();

        let err = auth
            .change_password(
                user.id,
                ChangePasswordRequest {
                    current_password: "wrong".into(),
                    new_password: "another1".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));

        auth.change_password(
            user.id,
            ChangePasswordRequest {
                current_password: "secret1".into(),
                new_password: "another1".into(),
            },
        )
        .await
        .unwrap();
        assert!(
            auth.login(LoginRequest {
                username: "priya".into(),
                password: "another1".into(),
            })
            .await
            .is_ok()
        );
    }

    #[tokio::test]
    async fn bootstrap_admin_runs_once() {
        let auth = auth();
        let hash = hash_password("adminpass").unwrap();
        let created = auth
            .bootstrap_admin("root", "Root@Campus.edu", &hash)
            .await
            .unwrap();
        assert_eq!(created.map(|u| u.role), Some(Role::Admin));
        assert!(
            auth.bootstrap_admin("root", "root@campus.edu", &hash)
                .await
                .unwrap()
                .is_none()
        );
    }
}
