use crate::domain::shared::urgency::Urgency;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A group of complaints judged similar by keyword overlap.
///
/// `problem_count` is the number of unsolved complaints referencing this
/// cluster. It is recomputed from storage whenever membership changes and
/// never adjusted incrementally.
#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct ClusterGroup {
    pub id: Uuid,

    /// Representative keyword set, taken from the complaint that opened the cluster
    pub keywords: Vec<String>,

    pub problem_count: i32,

    pub urgency: Urgency,

    pub last_updated: DateTime<Utc>,
}
