use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;

pub const URGENT_THRESHOLD: i64 = 10;
pub const CRITICAL_THRESHOLD: i64 = 25;
pub const TOP_PRIORITY_THRESHOLD: i64 = 50;
pub const EMERGENCY_THRESHOLD: i64 = 100;

/// Attention tier derived solely from the number of active complaints
/// sharing a cluster.
///
/// Variants are declared lowest first, so the derived `Ord` follows the
/// tier ordering `normal < urgent < critical < top_priority < emergency`.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    TS,
    sqlx::Type,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Urgency {
    #[default]
    Normal,
    Urgent,
    Critical,
    TopPriority,
    Emergency,
}

impl Urgency {
    /// Maps an active-member count to its tier, highest threshold first.
    pub fn for_count(count: i64) -> Self {
        if count >= EMERGENCY_THRESHOLD {
            Urgency::Emergency
        } else if count >= TOP_PRIORITY_THRESHOLD {
            Urgency::TopPriority
        } else if count >= CRITICAL_THRESHOLD {
            Urgency::Critical
        } else if count >= URGENT_THRESHOLD {
            Urgency::Urgent
        } else {
            Urgency::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Normal => "normal",
            Urgency::Urgent => "urgent",
            Urgency::Critical => "critical",
            Urgency::TopPriority => "top_priority",
            Urgency::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Urgency::Normal),
            "urgent" => Ok(Urgency::Urgent),
            "critical" => Ok(Urgency::Critical),
            "top_priority" => Ok(Urgency::TopPriority),
            "emergency" => Ok(Urgency::Emergency),
            other => Err(format!("unknown urgency '{}'", other)),
        }
    }
}
