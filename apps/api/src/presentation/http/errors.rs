//! HTTP error handling and response conversion.
//!
//! Errors are mapped to status codes and a JSON body of the form
//! `{"error": "..."}`. Ban rejections additionally carry `banned_until`.
//! Server-side failures are logged in full and answered with a generic
//! message.

use crate::{
    application::submit_complaint::dto::SubmissionError,
    domain::shared::errors::{DomainError, first_validation_message},
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found (404).
    NotFound(String),

    /// Malformed request (400).
    BadRequest(String),

    /// Missing or invalid credentials (401).
    Unauthorized(String),

    /// Authenticated but not allowed (403).
    Forbidden(String),

    /// Policy rejection carrying the ban expiry (403).
    Banned {
        message: String,
        banned_until: DateTime<Utc>,
    },

    /// Request data failed validation (400).
    ValidationError(String),

    /// Unique constraint or state conflict (409).
    Conflict(String),

    /// Rate limit exceeded (429).
    RateLimited,

    /// Database operation failed (500).
    Database(String),

    /// Redis operation failed (500).
    Cache(String),

    /// External service failure (503).
    ExternalService(String),

    /// Unclassified internal error (500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            Self::Banned {
                message,
                banned_until,
            } => write!(f, "Banned until {}: {}", banned_until, message),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Self::RateLimited => write!(f, "Rate limit exceeded"),
            Self::Database(msg) => write!(f, "Database error: {}", msg),
            Self::Cache(msg) => write!(f, "Cache error: {}", msg),
            Self::ExternalService(msg) => write!(f, "External service error: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) | Self::Banned { .. } => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Database(_) | Self::Cache(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ExternalService(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get a user-safe error message (without implementation details).
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(msg)
            | Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::ValidationError(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Banned { message, .. } => message.clone(),
            Self::RateLimited => "Too many requests, please try again later".into(),
            Self::Database(_) => "Database operation failed".into(),
            Self::Cache(_) => "Cache operation failed".into(),
            Self::ExternalService(_) => "External service unavailable".into(),
            Self::Internal(_) => "Internal server error".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
                tracing::error!("error={}", self);
            }
            StatusCode::BAD_REQUEST | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                tracing::warn!("error={}", self);
            }
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::debug!("error={}", self);
            }
            _ => {
                tracing::info!("error={}", self);
            }
        }

        let body = match &self {
            Self::Banned { banned_until, .. } => {
                json!({ "error": message, "banned_until": banned_until })
            }
            _ => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

// === Domain Error Conversion ===

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::ValidationError(msg) => AppError::ValidationError(msg),
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::InfrastructureError(msg) => {
                tracing::error!(infrastructure_error = %msg);
                AppError::Internal(msg)
            }
            DomainError::RateLimitExceeded => AppError::RateLimited,
            DomainError::Unauthorized => AppError::Unauthorized("Invalid credentials".into()),
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::AlreadyBanned { banned_until }
            | SubmissionError::Abusive { banned_until, .. } => AppError::Banned {
                message: err.to_string(),
                banned_until,
            },
            SubmissionError::Validation(msg) => AppError::ValidationError(msg),
            SubmissionError::Domain(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(first_validation_message(&errors))
    }
}

// === Database Error Conversion ===

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::PoolTimedOut => {
                tracing::warn!("Database connection pool exhausted, timing out");
                AppError::Database("Connection pool exhausted".into())
            }
            sqlx::Error::PoolClosed => {
                tracing::error!("Database connection pool closed");
                AppError::Database("Database connection unavailable".into())
            }
            _ => {
                tracing::error!(database_error = %err);
                AppError::Database("Database error".into())
            }
        }
    }
}

// === Redis Error Conversion ===

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        tracing::error!(redis_error = %err, "Redis operation failed");
        AppError::Cache(format!("Redis error: {}", err))
    }
}

// === HTTP Client Error Conversion ===

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            tracing::warn!(reqwest_timeout = %err);
            AppError::ExternalService("Request timeout".into())
        } else if err.is_connect() {
            tracing::warn!(reqwest_connect = %err);
            AppError::ExternalService("Connection failed".into())
        } else {
            tracing::error!(reqwest_error = %err);
            AppError::ExternalService("External service unavailable".into())
        }
    }
}

// === General Fallback Error Conversion ===

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(anyhow_error = %err, "Unclassified error with chain");
        err.chain().for_each(|cause| {
            tracing::error!(cause = %cause, "Error source");
        });
        AppError::Internal("Operation failed".into())
    }
}
