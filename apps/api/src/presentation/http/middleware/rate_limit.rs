use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::presentation::http::{
    errors::AppError, middleware::user::optional_user_id, state::AppState,
};

fn extract_client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or("unknown")
        .to_string()
}

/// Hourly cap on complaint submissions, keyed by user when a token is
/// present and by client IP otherwise.
pub async fn submission_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let limit = state.config.rate_limit_complaints_per_hour;
    let Some(limiter) = state.rate_limiter.as_ref().filter(|_| limit > 0) else {
        return Ok(next.run(request).await);
    };

    let subject = match optional_user_id(request.headers(), &state.config.jwt_secret) {
        Some(user_id) => format!("user:{}", user_id),
        None => format!("ip:{}", extract_client_ip(request.headers())),
    };
    let hour = chrono::Utc::now().format("%Y-%m-%d-%H");
    let key = format!("complaints:{}:{}", subject, hour);

    if !limiter.check(&key, limit).await {
        return Err(AppError::RateLimited);
    }
    Ok(next.run(request).await)
}
