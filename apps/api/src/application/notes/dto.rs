use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, TS, Validate)]
#[ts(export)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 20, message = "Branch is required"))]
    pub branch: String,
    #[validate(range(min = 1, max = 8, message = "Semester must be between 1 and 8"))]
    pub semester: i32,
    #[validate(length(min = 1, max = 120, message = "Subject is required"))]
    pub subject: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Validate)]
#[ts(export)]
pub struct CreateFileRequest {
    pub category_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "File URL is required"))]
    pub file_url: String,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    #[serde(default)]
    pub price: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Validate)]
#[ts(export)]
pub struct CreateBundleRequest {
    pub category_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: i32,
    #[validate(range(min = 0, max = 100, message = "Discount must be between 0 and 100"))]
    #[serde(default)]
    pub discount_percentage: i32,
    #[validate(length(min = 1, message = "A bundle needs at least one file"))]
    pub file_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Validate)]
#[ts(export)]
pub struct PurchaseRequest {
    #[validate(length(min = 1, message = "Payment proof is required"))]
    pub payment_proof: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VerifyPurchaseRequest {
    /// `verified` or `rejected`
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FileAccess {
    pub file_id: Uuid,
    pub file_url: String,
}
