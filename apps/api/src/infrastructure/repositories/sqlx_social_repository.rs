use crate::domain::{
    shared::errors::DomainError,
    social::{
        reaction::{Reaction, ReactionCount, Vote, VoteOutcome},
        repository::SocialRepository,
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::str::FromStr;
use tracing::instrument;
use uuid::Uuid;

pub struct SqlxSocialRepository {
    pub pool: PgPool,
}

impl SqlxSocialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn vote_from(is_like: bool) -> Vote {
    if is_like { Vote::Like } else { Vote::Dislike }
}

#[async_trait]
impl SocialRepository for SqlxSocialRepository {
    #[instrument(skip(self))]
    async fn toggle_vote(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
        vote: Vote,
    ) -> Result<VoteOutcome, DomainError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, (Uuid, bool)>(
            "SELECT id, is_like FROM likes WHERE complaint_id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(complaint_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let is_like = vote.is_like();
        // (likes delta, dislikes delta, resulting vote)
        let (like_delta, dislike_delta, current) = match existing {
            Some((id, previous)) if previous == is_like => {
                sqlx::query("DELETE FROM likes WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                if is_like { (-1, 0, None) } else { (0, -1, None) }
            }
            Some((id, _)) => {
                sqlx::query("UPDATE likes SET is_like = $2 WHERE id = $1")
                    .bind(id)
                    .bind(is_like)
                    .execute(&mut *tx)
                    .await?;
                if is_like { (1, -1, Some(vote)) } else { (-1, 1, Some(vote)) }
            }
            None => {
                sqlx::query(
                    "INSERT INTO likes (id, complaint_id, user_id, is_like) VALUES ($1, $2, $3, $4)",
                )
                .bind(Uuid::now_v7())
                .bind(complaint_id)
                .bind(user_id)
                .bind(is_like)
                .execute(&mut *tx)
                .await?;
                if is_like { (1, 0, Some(vote)) } else { (0, 1, Some(vote)) }
            }
        };

        let (likes_count, dislikes_count) = sqlx::query_as::<_, (i32, i32)>(
            "UPDATE complaints \
             SET likes_count = GREATEST(0, likes_count + $2), \
                 dislikes_count = GREATEST(0, dislikes_count + $3) \
             WHERE id = $1 RETURNING likes_count, dislikes_count",
        )
        .bind(complaint_id)
        .bind(like_delta)
        .bind(dislike_delta)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Complaint {} not found", complaint_id)))?;

        tx.commit().await?;
        Ok(VoteOutcome {
            current,
            likes_count,
            dislikes_count,
        })
    }

    async fn user_vote(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Vote>, DomainError> {
        let is_like = sqlx::query_scalar::<_, bool>(
            "SELECT is_like FROM likes WHERE complaint_id = $1 AND user_id = $2",
        )
        .bind(complaint_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(is_like.map(vote_from))
    }

    #[instrument(skip(self))]
    async fn toggle_reaction(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<bool, DomainError> {
        let removed = sqlx::query(
            "DELETE FROM reactions WHERE complaint_id = $1 AND user_id = $2 AND emoji = $3",
        )
        .bind(complaint_id)
        .bind(user_id)
        .bind(reaction.as_str())
        .execute(&self.pool)
        .await?;
        if removed.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO reactions (id, complaint_id, user_id, emoji) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (complaint_id, user_id, emoji) DO NOTHING",
        )
        .bind(Uuid::now_v7())
        .bind(complaint_id)
        .bind(user_id)
        .bind(reaction.as_str())
        .execute(&self.pool)
        .await?;
        Ok(true)
    }

    async fn reaction_counts(&self, complaint_id: Uuid) -> Result<Vec<ReactionCount>, DomainError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT emoji, COUNT(*) FROM reactions WHERE complaint_id = $1 \
             GROUP BY emoji ORDER BY emoji",
        )
        .bind(complaint_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(emoji, count)| ReactionCount { emoji, count })
            .collect())
    }

    async fn user_reactions(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Reaction>, DomainError> {
        let emojis = sqlx::query_scalar::<_, String>(
            "SELECT emoji FROM reactions WHERE complaint_id = $1 AND user_id = $2 ORDER BY created_at",
        )
        .bind(complaint_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(emojis
            .iter()
            .filter_map(|e| Reaction::from_str(e).ok())
            .collect())
    }
}
