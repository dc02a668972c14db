use super::dto::{LeaderboardEntry, LeaderboardResponse};
use crate::domain::{
    complaint::repository::ComplaintRepository,
    shared::{errors::DomainError, pagination::PaginationRequest},
    social::{
        reaction::{Reaction, Vote, VoteOutcome},
        repository::SocialRepository,
    },
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub struct SocialUseCase {
    social: Arc<dyn SocialRepository>,
    complaints: Arc<dyn ComplaintRepository>,
}

impl SocialUseCase {
    pub fn new(
        social: Arc<dyn SocialRepository>,
        complaints: Arc<dyn ComplaintRepository>,
    ) -> Self {
        Self { social, complaints }
    }

    #[instrument(skip(self))]
    pub async fn vote(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
        vote: Vote,
    ) -> Result<VoteOutcome, DomainError> {
        self.social.toggle_vote(complaint_id, user_id, vote).await
    }

    /// Toggles `emoji` for the user. Unknown emoji are rejected before the
    /// complaint is looked up.
    #[instrument(skip(self))]
    pub async fn react(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
        emoji: &str,
    ) -> Result<(Reaction, bool), DomainError> {
        if emoji.trim().is_empty() {
            return Err(DomainError::ValidationError("Emoji required".into()));
        }
        let reaction: Reaction = emoji.parse().map_err(DomainError::ValidationError)?;

        if self.complaints.find_by_id(complaint_id).await?.is_none() {
            return Err(DomainError::NotFound("Complaint not found".into()));
        }
        let added = self
            .social
            .toggle_reaction(complaint_id, user_id, reaction)
            .await?;
        Ok((reaction, added))
    }

    #[instrument(skip(self))]
    pub async fn leaderboard(
        &self,
        viewer: Option<Uuid>,
        page: PaginationRequest,
    ) -> Result<LeaderboardResponse, DomainError> {
        let page = page.sanitized();
        let complaints = self.complaints.leaderboard(page.limit, page.offset).await?;
        let stats = self.complaints.stats().await?;

        let mut entries = Vec::with_capacity(complaints.len());
        for complaint in complaints {
            let reactions = self.social.reaction_counts(complaint.id).await?;
            let (vote, user_reactions) = match viewer {
                Some(user_id) => (
                    self.social.user_vote(complaint.id, user_id).await?,
                    self.social.user_reactions(complaint.id, user_id).await?,
                ),
                None => (None, Vec::new()),
            };
            entries.push(LeaderboardEntry {
                complaint,
                reactions,
                user_liked: vote == Some(Vote::Like),
                user_disliked: vote == Some(Vote::Dislike),
                user_reactions,
            });
        }

        Ok(LeaderboardResponse {
            complaints: entries,
            stats,
            limit: page.limit,
            offset: page.offset,
        })
    }
}
