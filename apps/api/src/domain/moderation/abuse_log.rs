use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Audit record of a rejected submission. Written once per detection and
/// never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct AbuseLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub flagged_text: String,
    pub detected_words: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAbuseLog {
    pub user_id: Uuid,
    pub username: String,
    pub flagged_text: String,
    pub detected_words: Vec<String>,
}
