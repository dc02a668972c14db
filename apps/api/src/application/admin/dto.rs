use crate::domain::{
    complaint::entity::{Complaint, ComplaintStats},
    moderation::abuse_log::AbuseLog,
    user::entity::{PublicUser, UserStats},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdminStats {
    pub complaints: ComplaintStats,
    pub users: UserStats,
    pub abuse_logs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdminDashboard {
    pub stats: AdminStats,
    pub complaints: Vec<Complaint>,
    pub users: Vec<PublicUser>,
    pub abuse_logs: Vec<AbuseLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SetRoleRequest {
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
pub struct BanRequest {
    /// Defaults to 48 when absent or not positive
    #[validate(range(max = 8760, message = "Ban length cannot exceed one year"))]
    pub hours: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BanResponse {
    pub success: bool,
    pub banned_until: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecalculateResponse {
    pub success: bool,
    pub clusters: usize,
}
