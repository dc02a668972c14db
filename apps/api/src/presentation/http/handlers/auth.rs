use axum::{Json, extract::State, http::HeaderMap};
use serde_json::{Value, json};

use crate::{
    application::auth::dto::{AuthResponse, ChangePasswordRequest, LoginRequest, SignupRequest},
    domain::user::entity::{PublicUser, User},
    presentation::http::{
        errors::AppError,
        middleware::user::{issue_user_token, required_user_id},
        state::AppState,
    },
};

fn auth_response(state: &AppState, user: User) -> Result<Json<AuthResponse>, AppError> {
    let token = issue_user_token(&user, &state.config.jwt_secret, state.config.token_ttl_hours)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state.auth().signup(body).await?;
    auth_response(&state, user)
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state.auth().login(body).await?;
    auth_response(&state, user)
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PublicUser>, AppError> {
    let user_id = required_user_id(&headers, &state.config.jwt_secret)?;
    let user = state.auth().current_user(user_id).await?;
    Ok(Json(user.into()))
}

pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let user_id = required_user_id(&headers, &state.config.jwt_secret)?;
    state.auth().change_password(user_id, body).await?;
    Ok(Json(json!({ "success": true })))
}
