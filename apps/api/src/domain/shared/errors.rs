use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

#[derive(Debug, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
    #[error("Unauthorized")]
    Unauthorized,
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // 23505 = unique_violation
            if db_err.code().as_deref() == Some("23505") {
                return DomainError::Conflict(db_err.message().to_string());
            }
        }
        DomainError::InfrastructureError(err.to_string())
    }
}

/// First human-readable message out of a validator error set.
///
/// Field names are visited in sorted order so the message is stable when
/// several fields fail at once.
pub fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().collect();
    fields.sort();
    fields
        .into_iter()
        .filter_map(|field| field_errors.get(field))
        .flat_map(|errs| errs.iter())
        .map(|err| match &err.message {
            Some(message) => message.to_string(),
            None => format!("Invalid value ({})", err.code),
        })
        .next()
        .unwrap_or_else(|| "Invalid input".to_string())
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(first_validation_message(&errors))
    }
}
