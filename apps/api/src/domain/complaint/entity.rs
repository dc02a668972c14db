use crate::domain::shared::urgency::Urgency;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;
use uuid::Uuid;

/// A single student-submitted issue report.
///
/// # Invariants
/// - `urgency` equals `Urgency::for_count(similar_complaints_count)` for every
///   unsolved complaint once its cluster has been recomputed
/// - solved complaints keep `urgency = normal` and do not count towards
///   their cluster's active total
/// - `keywords` holds at most five entries
#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct Complaint {
    pub id: Uuid,

    /// Author of the complaint
    pub user_id: Uuid,

    /// Author's username at submission time
    pub username: String,

    pub original_text: String,

    /// Short summary produced by the analysis step (max 100 chars)
    pub summary: Option<String>,

    pub severity: Severity,

    /// Clustering keywords, most relevant first
    pub keywords: Vec<String>,

    pub status: ComplaintStatus,

    pub solved: bool,

    /// Staff member who resolved the complaint
    pub solved_by: Option<Uuid>,

    pub solved_at: Option<DateTime<Utc>>,

    pub urgency: Urgency,

    /// Mirrors the active-member count of the cluster
    pub similar_complaints_count: i32,

    pub cluster_id: Option<Uuid>,

    pub likes_count: i32,

    pub dislikes_count: i32,

    pub created_at: DateTime<Utc>,
}

impl Complaint {
    /// Applies the resolution fields. Urgency is forced back to `normal`
    /// here because the cluster recompute only touches unsolved members.
    pub fn mark_solved(&mut self, resolver: Uuid, at: DateTime<Utc>) {
        self.status = ComplaintStatus::Solved;
        self.solved = true;
        self.solved_by = Some(resolver);
        self.solved_at = Some(at);
        self.urgency = Urgency::Normal;
        self.similar_complaints_count = 0;
    }

    /// Moves the complaint to `pending` or `in_progress`, clearing any
    /// resolution.
    pub fn reopen(&mut self, status: ComplaintStatus) {
        self.status = status;
        self.solved = false;
        self.solved_by = None;
        self.solved_at = None;
    }
}

/// Insert payload for a freshly analysed complaint.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub user_id: Uuid,
    pub username: String,
    pub original_text: String,
    pub summary: Option<String>,
    pub severity: Severity,
    pub keywords: Vec<String>,
    pub cluster_id: Option<Uuid>,
    pub similar_complaints_count: i32,
    pub urgency: Urgency,
}

/// Impact rating assigned by the analysis step. Independent of urgency.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, TS, sqlx::Type, Default, PartialEq, Eq, Hash,
)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Severity {
    Good,
    #[default]
    Average,
    Poor,
    Bad,
    Worst,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Good => "good",
            Severity::Average => "average",
            Severity::Poor => "poor",
            Severity::Bad => "bad",
            Severity::Worst => "worst",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" => Ok(Severity::Good),
            "average" => Ok(Severity::Average),
            "poor" => Ok(Severity::Poor),
            "bad" => Ok(Severity::Bad),
            "worst" => Ok(Severity::Worst),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// Triage state of a complaint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, sqlx::Type, Default, PartialEq, Eq)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ComplaintStatus {
    #[default]
    Pending,
    InProgress,
    Solved,
}

impl ComplaintStatus {
    pub fn is_solved(&self) -> bool {
        matches!(self, ComplaintStatus::Solved)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Solved => "solved",
        }
    }
}

impl FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ComplaintStatus::Pending),
            "in_progress" => Ok(ComplaintStatus::InProgress),
            "solved" => Ok(ComplaintStatus::Solved),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// Aggregate counters shown on the leaderboard and admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, PartialEq, Eq)]
#[ts(export)]
pub struct ComplaintStats {
    pub total: i64,
    pub pending: i64,
    pub solved: i64,
    pub urgent: i64,
    /// `critical` and `top_priority` complaints together
    pub critical: i64,
    pub emergency: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Complaint {
        Complaint {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            username: "asha".into(),
            original_text: "Hostel water cooler broken".into(),
            summary: None,
            severity: Severity::Worst,
            keywords: vec!["hostel".into(), "water".into()],
            status: ComplaintStatus::Pending,
            solved: false,
            solved_by: None,
            solved_at: None,
            urgency: Urgency::Urgent,
            similar_complaints_count: 12,
            cluster_id: Some(Uuid::now_v7()),
            likes_count: 0,
            dislikes_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn marking_solved_resets_urgency_and_count() {
        let mut complaint = sample();
        let staff = Uuid::now_v7();
        complaint.mark_solved(staff, Utc::now());
        assert!(complaint.solved);
        assert_eq!(complaint.status, ComplaintStatus::Solved);
        assert_eq!(complaint.urgency, Urgency::Normal);
        assert_eq!(complaint.similar_complaints_count, 0);
        assert_eq!(complaint.solved_by, Some(staff));
    }

    #[test]
    fn reopening_clears_resolution() {
        let mut complaint = sample();
        complaint.mark_solved(Uuid::now_v7(), Utc::now());
        complaint.reopen(ComplaintStatus::InProgress);
        assert!(!complaint.solved);
        assert!(complaint.solved_by.is_none());
        assert!(complaint.solved_at.is_none());
        assert_eq!(complaint.status, ComplaintStatus::InProgress);
    }

    #[test]
    fn severity_parsing_is_lenient_on_case() {
        assert_eq!(" Critical ".parse::<Severity>(), Ok(Severity::Critical));
        assert!("meh".parse::<Severity>().is_err());
    }
}
