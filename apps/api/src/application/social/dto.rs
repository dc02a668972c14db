use crate::domain::{
    complaint::entity::{Complaint, ComplaintStats},
    social::reaction::{Reaction, ReactionCount},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReactRequest {
    pub emoji: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReactResponse {
    pub emoji: Reaction,
    /// `false` when the toggle removed an existing reaction
    pub added: bool,
}

/// A leaderboard row: the complaint plus its reactions and the viewer's
/// own votes. Viewer fields are empty for anonymous requests.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaderboardEntry {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub reactions: Vec<ReactionCount>,
    pub user_liked: bool,
    pub user_disliked: bool,
    pub user_reactions: Vec<Reaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaderboardResponse {
    pub complaints: Vec<LeaderboardEntry>,
    pub stats: ComplaintStats,
    pub limit: i64,
    pub offset: i64,
}
