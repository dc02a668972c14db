use axum::{
    Json,
    extract::{Extension, Path, State},
    http::{HeaderMap, StatusCode},
};
use uuid::Uuid;

use crate::{
    application::notes::dto::{
        CreateBundleRequest, CreateCategoryRequest, CreateFileRequest, FileAccess,
        PurchaseRequest, VerifyPurchaseRequest,
    },
    domain::notes::entity::{
        BundlePurchase, NotesBundle, NotesCategory, NotesFile, NotesPurchase, PurchaseList,
    },
    presentation::http::{
        errors::AppError,
        middleware::{staff::StaffUser, user::required_user_id},
        state::AppState,
    },
};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<NotesCategory>>, AppError> {
    Ok(Json(state.notes().list_categories().await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<NotesCategory>), AppError> {
    let category = state.notes().create_category(body).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_files(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<Vec<NotesFile>>, AppError> {
    Ok(Json(state.notes().list_files(category_id).await?))
}

pub async fn create_file(
    State(state): State<AppState>,
    Extension(StaffUser(staff)): Extension<StaffUser>,
    Json(body): Json<CreateFileRequest>,
) -> Result<(StatusCode, Json<NotesFile>), AppError> {
    let file = state.notes().create_file(staff.id, body).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

pub async fn list_bundles(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<Vec<NotesBundle>>, AppError> {
    Ok(Json(state.notes().list_bundles(category_id).await?))
}

pub async fn create_bundle(
    State(state): State<AppState>,
    Json(body): Json<CreateBundleRequest>,
) -> Result<(StatusCode, Json<NotesBundle>), AppError> {
    let bundle = state.notes().create_bundle(body).await?;
    Ok((StatusCode::CREATED, Json(bundle)))
}

pub async fn purchase_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file_id): Path<Uuid>,
    Json(body): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<NotesPurchase>), AppError> {
    let buyer = required_user_id(&headers, &state.config.jwt_secret)?;
    let purchase = state.notes().purchase_file(file_id, buyer, body).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

pub async fn purchase_bundle(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bundle_id): Path<Uuid>,
    Json(body): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<BundlePurchase>), AppError> {
    let buyer = required_user_id(&headers, &state.config.jwt_secret)?;
    let purchase = state.notes().purchase_bundle(bundle_id, buyer, body).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

pub async fn file_access(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file_id): Path<Uuid>,
) -> Result<Json<FileAccess>, AppError> {
    let user_id = required_user_id(&headers, &state.config.jwt_secret)?;
    Ok(Json(state.notes().file_access(file_id, user_id).await?))
}

pub async fn my_purchases(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PurchaseList>, AppError> {
    let user_id = required_user_id(&headers, &state.config.jwt_secret)?;
    Ok(Json(state.notes().my_purchases(user_id).await?))
}

pub async fn pending_purchases(
    State(state): State<AppState>,
) -> Result<Json<PurchaseList>, AppError> {
    Ok(Json(state.notes().pending_purchases().await?))
}

pub async fn verify_file_purchase(
    State(state): State<AppState>,
    Extension(StaffUser(staff)): Extension<StaffUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<VerifyPurchaseRequest>,
) -> Result<Json<NotesPurchase>, AppError> {
    Ok(Json(
        state
            .notes()
            .review_file_purchase(id, staff.id, &body.status)
            .await?,
    ))
}

pub async fn verify_bundle_purchase(
    State(state): State<AppState>,
    Extension(StaffUser(staff)): Extension<StaffUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<VerifyPurchaseRequest>,
) -> Result<Json<BundlePurchase>, AppError> {
    Ok(Json(
        state
            .notes()
            .review_bundle_purchase(id, staff.id, &body.status)
            .await?,
    ))
}
