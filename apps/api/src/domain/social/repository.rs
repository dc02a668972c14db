use super::reaction::{Reaction, ReactionCount, Vote, VoteOutcome};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait SocialRepository: Send + Sync {
    /// Casting the same vote twice removes it; casting the opposite vote
    /// switches it. Complaint counters move with the vote.
    async fn toggle_vote(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
        vote: Vote,
    ) -> Result<VoteOutcome, DomainError>;
    async fn user_vote(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Vote>, DomainError>;
    /// Returns `true` when the reaction was added, `false` when removed.
    async fn toggle_reaction(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<bool, DomainError>;
    async fn reaction_counts(&self, complaint_id: Uuid) -> Result<Vec<ReactionCount>, DomainError>;
    async fn user_reactions(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Reaction>, DomainError>;
}
