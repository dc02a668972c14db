use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde_json::{Value, json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    application::{
        admin::dto::{
            AdminDashboard, BanRequest, BanResponse, RecalculateResponse, SetRoleRequest,
        },
        manage_complaints::dto::{AdminEditRequest, BulkDeleteRequest, BulkDeleteResponse},
    },
    domain::complaint::entity::Complaint,
    presentation::http::{errors::AppError, middleware::staff::StaffUser, state::AppState},
};

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<AdminDashboard>, AppError> {
    Ok(Json(state.admin().dashboard().await?))
}

pub async fn edit_complaint(
    State(state): State<AppState>,
    Extension(StaffUser(staff)): Extension<StaffUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<AdminEditRequest>,
) -> Result<Json<Complaint>, AppError> {
    Ok(Json(
        state.manage_complaints().admin_edit(id, staff.id, body).await?,
    ))
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(body): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>, AppError> {
    body.validate()?;
    let deleted = state.manage_complaints().bulk_delete(&body.ids).await?;
    Ok(Json(BulkDeleteResponse {
        success: true,
        deleted,
    }))
}

pub async fn set_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetRoleRequest>,
) -> Result<Json<Value>, AppError> {
    let role = state.admin().set_role(id, &body.role).await?;
    Ok(Json(json!({ "success": true, "role": role })))
}

/// An empty or missing body bans for the default period.
pub async fn ban_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<BanRequest>>,
) -> Result<Json<BanResponse>, AppError> {
    let hours = match body {
        Some(Json(body)) => {
            body.validate()?;
            body.hours
        }
        None => None,
    };
    let banned_until = state.admin().ban(id, hours).await?;
    Ok(Json(BanResponse {
        success: true,
        banned_until,
    }))
}

pub async fn unban_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.admin().unban(id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn recalculate_clusters(
    State(state): State<AppState>,
) -> Result<Json<RecalculateResponse>, AppError> {
    let clusters = state.admin().recalculate_clusters().await?;
    Ok(Json(RecalculateResponse {
        success: true,
        clusters,
    }))
}
