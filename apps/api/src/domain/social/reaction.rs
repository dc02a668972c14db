use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

/// Emoji reactions a user can toggle on a complaint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Reaction {
    Thumbsup,
    Thumbsdown,
    Fire,
    Warning,
    Check,
}

pub const EMOJI_REACTIONS: [Reaction; 5] = [
    Reaction::Thumbsup,
    Reaction::Thumbsdown,
    Reaction::Fire,
    Reaction::Warning,
    Reaction::Check,
];

impl Reaction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reaction::Thumbsup => "thumbsup",
            Reaction::Thumbsdown => "thumbsdown",
            Reaction::Fire => "fire",
            Reaction::Warning => "warning",
            Reaction::Check => "check",
        }
    }
}

impl FromStr for Reaction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EMOJI_REACTIONS
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Invalid emoji '{}'", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq, Eq)]
#[ts(export)]
pub struct ReactionCount {
    pub emoji: String,
    pub count: i64,
}

/// The caller's standing vote on a complaint after a toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Vote {
    Like,
    Dislike,
}

impl Vote {
    pub fn is_like(&self) -> bool {
        matches!(self, Vote::Like)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq, Eq)]
#[ts(export)]
pub struct VoteOutcome {
    /// `None` when the toggle removed the previous vote
    pub current: Option<Vote>,
    pub likes_count: i32,
    pub dislikes_count: i32,
}
