use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use uuid::Uuid;

use crate::{
    application::social::dto::{ReactRequest, ReactResponse},
    domain::social::reaction::{Vote, VoteOutcome},
    presentation::http::{errors::AppError, middleware::user::required_user_id, state::AppState},
};

async fn toggle_vote(
    state: &AppState,
    headers: &HeaderMap,
    id: Uuid,
    vote: Vote,
) -> Result<Json<VoteOutcome>, AppError> {
    let user_id = required_user_id(headers, &state.config.jwt_secret)?;
    Ok(Json(state.social().vote(id, user_id, vote).await?))
}

pub async fn like_complaint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<VoteOutcome>, AppError> {
    toggle_vote(&state, &headers, id, Vote::Like).await
}

pub async fn dislike_complaint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<VoteOutcome>, AppError> {
    toggle_vote(&state, &headers, id, Vote::Dislike).await
}

pub async fn react_to_complaint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<ReactRequest>,
) -> Result<Json<ReactResponse>, AppError> {
    let user_id = required_user_id(&headers, &state.config.jwt_secret)?;
    let (emoji, added) = state.social().react(id, user_id, &body.emoji).await?;
    Ok(Json(ReactResponse { emoji, added }))
}
