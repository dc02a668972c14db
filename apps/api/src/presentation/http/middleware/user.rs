use axum::http::{HeaderMap, header};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{domain::user::entity::User, presentation::http::errors::AppError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub exp: usize,
}

impl UserClaims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }
}

pub fn issue_user_token(user: &User, secret: &str, ttl_hours: i64) -> Result<String, AppError> {
    let exp = (Utc::now() + Duration::hours(ttl_hours)).timestamp() as usize;
    let claims = UserClaims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: user.role.as_str().to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

pub fn decode_optional_user_claims(headers: &HeaderMap, secret: &str) -> Option<UserClaims> {
    let token = extract_bearer_token(headers)?;
    decode::<UserClaims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|d| d.claims)
}

pub fn decode_required_user_claims(
    headers: &HeaderMap,
    secret: &str,
) -> Result<UserClaims, AppError> {
    decode_optional_user_claims(headers, secret)
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))
}

/// Subject of a valid bearer token, if any.
pub fn optional_user_id(headers: &HeaderMap, secret: &str) -> Option<Uuid> {
    decode_optional_user_claims(headers, secret).and_then(|c| c.user_id().ok())
}

pub fn required_user_id(headers: &HeaderMap, secret: &str) -> Result<Uuid, AppError> {
    decode_required_user_claims(headers, secret)?.user_id()
}
