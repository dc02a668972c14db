use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    domain::user::entity::User,
    presentation::http::{
        errors::AppError, middleware::user::decode_required_user_claims, state::AppState,
    },
};

/// The authenticated staff member, inserted into request extensions by
/// [`require_staff`].
#[derive(Debug, Clone)]
pub struct StaffUser(pub User);

/// Admits moderators and admins. The role is read from storage on every
/// request, so a demotion takes effect before the token expires.
pub async fn require_staff(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = decode_required_user_claims(req.headers(), &state.config.jwt_secret)?;
    let user_id = claims.user_id()?;

    let user = state
        .repos
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;
    if !user.is_staff() {
        return Err(AppError::Forbidden("Staff access required".to_string()));
    }

    req.extensions_mut().insert(StaffUser(user));
    Ok(next.run(req).await)
}
