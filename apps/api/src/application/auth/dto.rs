use crate::domain::user::entity::{PublicUser, UserType};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, TS, Validate)]
#[ts(export)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 50, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub roll_number: Option<String>,
    #[serde(default)]
    pub user_type: UserType,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Validate)]
#[ts(export)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Validate)]
#[ts(export)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}
