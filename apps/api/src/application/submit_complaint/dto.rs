use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::domain::shared::errors::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitComplaintRequest {
    pub original_text: String,
}

/// Why a submission was refused.
///
/// The two ban variants are policy outcomes rather than faults; the HTTP
/// layer turns them into a 403 carrying `banned_until`.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Your account is temporarily banned")]
    AlreadyBanned { banned_until: DateTime<Utc> },

    #[error(
        "Your submission contains inappropriate language. Your account has been suspended for {ban_hours} hours."
    )]
    Abusive {
        banned_until: DateTime<Utc>,
        ban_hours: i64,
        detected_words: Vec<String>,
    },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl SubmissionError {
    pub fn banned_until(&self) -> Option<DateTime<Utc>> {
        match self {
            SubmissionError::AlreadyBanned { banned_until }
            | SubmissionError::Abusive { banned_until, .. } => Some(*banned_until),
            _ => None,
        }
    }
}
