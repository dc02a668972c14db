use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    application::{
        manage_complaints::dto::Actor,
        social::dto::LeaderboardResponse,
        submit_complaint::dto::SubmitComplaintRequest,
    },
    domain::{complaint::entity::Complaint, shared::pagination::PaginationRequest},
    presentation::http::{
        errors::AppError,
        middleware::{
            staff::StaffUser,
            user::{optional_user_id, required_user_id},
        },
        state::AppState,
    },
};

pub async fn submit_complaint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SubmitComplaintRequest>,
) -> Result<(StatusCode, Json<Complaint>), AppError> {
    let user_id = required_user_id(&headers, &state.config.jwt_secret)?;
    let complaint = state.submit_complaint().execute(user_id, body).await?;
    Ok((StatusCode::CREATED, Json(complaint)))
}

pub async fn leaderboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(page): Query<PaginationRequest>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let viewer = optional_user_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.social().leaderboard(viewer, page).await?))
}

/// Owners and staff may delete. Staff status is read from storage.
pub async fn delete_complaint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let user_id = required_user_id(&headers, &state.config.jwt_secret)?;
    let user = state
        .repos
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    state
        .manage_complaints()
        .delete(
            id,
            Actor {
                user_id,
                is_staff: user.is_staff(),
            },
        )
        .await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn solve_complaint(
    State(state): State<AppState>,
    Extension(StaffUser(staff)): Extension<StaffUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Complaint>, AppError> {
    Ok(Json(state.manage_complaints().resolve(id, staff.id).await?))
}
