use super::{
    handlers::{admin, auth, complaints, health, notes, social},
    middleware::rate_limit::submission_rate_limit,
    middleware::request_id::request_id_middleware,
    middleware::staff::require_staff,
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let staff_routes = Router::new()
        .route(
            "/api/v1/complaints/{id}/solve",
            put(complaints::solve_complaint),
        )
        .route("/api/v1/admin/dashboard", get(admin::dashboard))
        .route(
            "/api/v1/admin/complaints/bulk",
            delete(admin::bulk_delete),
        )
        .route(
            "/api/v1/admin/complaints/{id}",
            put(admin::edit_complaint),
        )
        .route("/api/v1/admin/users/{id}/role", put(admin::set_role))
        .route("/api/v1/admin/users/{id}/ban", put(admin::ban_user))
        .route("/api/v1/admin/users/{id}/unban", put(admin::unban_user))
        .route(
            "/api/v1/admin/clusters/recalculate",
            post(admin::recalculate_clusters),
        )
        // Notes marketplace management
        .route(
            "/api/v1/admin/notes/categories",
            post(notes::create_category),
        )
        .route("/api/v1/admin/notes/files", post(notes::create_file))
        .route("/api/v1/admin/notes/bundles", post(notes::create_bundle))
        .route(
            "/api/v1/admin/notes/purchases",
            get(notes::pending_purchases),
        )
        .route(
            "/api/v1/admin/notes/purchases/{id}/verify",
            put(notes::verify_file_purchase),
        )
        .route(
            "/api/v1/admin/notes/bundle-purchases/{id}/verify",
            put(notes::verify_bundle_purchase),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff));

    let submit_routes = Router::new()
        .route("/api/v1/complaints", post(complaints::submit_complaint))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            submission_rate_limit,
        ));

    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Auth
        .route("/api/v1/auth/signup", post(auth::signup))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/auth/change-password", post(auth::change_password))
        // Complaints
        .route("/api/v1/leaderboard", get(complaints::leaderboard))
        .route(
            "/api/v1/complaints/{id}",
            delete(complaints::delete_complaint),
        )
        // Social
        .route(
            "/api/v1/complaints/{id}/like",
            post(social::like_complaint),
        )
        .route(
            "/api/v1/complaints/{id}/dislike",
            post(social::dislike_complaint),
        )
        .route(
            "/api/v1/complaints/{id}/react",
            post(social::react_to_complaint),
        )
        // Notes marketplace
        .route("/api/v1/notes/categories", get(notes::list_categories))
        .route(
            "/api/v1/notes/categories/{id}/files",
            get(notes::list_files),
        )
        .route(
            "/api/v1/notes/categories/{id}/bundles",
            get(notes::list_bundles),
        )
        .route(
            "/api/v1/notes/files/{id}/purchase",
            post(notes::purchase_file),
        )
        .route(
            "/api/v1/notes/bundles/{id}/purchase",
            post(notes::purchase_bundle),
        )
        .route("/api/v1/notes/files/{id}/access", get(notes::file_access))
        .route("/api/v1/me/purchases", get(notes::my_purchases))
        .merge(submit_routes)
        .merge(staff_routes)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
