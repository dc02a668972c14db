use crate::domain::complaint::entity::ComplaintStatus;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// Staff edit of a complaint. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, Validate)]
#[ts(export)]
pub struct AdminEditRequest {
    #[validate(length(min = 1, max = 5000, message = "Complaint text is required"))]
    pub original_text: Option<String>,
    pub status: Option<ComplaintStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Validate)]
#[ts(export)]
pub struct BulkDeleteRequest {
    #[validate(length(min = 1, max = 200, message = "Between 1 and 200 ids required"))]
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BulkDeleteResponse {
    pub success: bool,
    pub deleted: usize,
}

/// Who is acting on a complaint.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub is_staff: bool,
}
