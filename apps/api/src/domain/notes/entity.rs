use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

/// First-semester material is given away.
pub const FREE_SEMESTER: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct NotesCategory {
    pub id: Uuid,
    pub branch: String,
    pub semester: i32,
    pub subject: String,
    pub created_at: DateTime<Utc>,
}

impl NotesCategory {
    pub fn is_free(&self) -> bool {
        self.semester == FREE_SEMESTER
    }
}

#[derive(Debug, Clone)]
pub struct NewNotesCategory {
    pub branch: String,
    pub semester: i32,
    pub subject: String,
}

/// A downloadable study file. `price` is in whole rupees.
#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct NotesFile {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Only handed out through the access check
    #[serde(skip)]
    #[ts(skip)]
    pub file_url: String,
    pub price: i32,
    pub is_free: bool,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotesFile {
    pub category_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub price: i32,
    pub is_free: bool,
    pub uploaded_by: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct NotesBundle {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Discounted bundle price
    pub price: i32,
    pub discount_percentage: i32,
    pub file_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotesBundle {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub discount_percentage: i32,
    pub file_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, sqlx::Type, Default, PartialEq, Eq)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "verified" => Ok(PaymentStatus::Verified),
            "rejected" => Ok(PaymentStatus::Rejected),
            other => Err(format!("Invalid payment status '{}'", other)),
        }
    }
}

/// Payment-proof submission for a single file.
#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct NotesPurchase {
    pub id: Uuid,
    pub file_id: Uuid,
    pub buyer_id: Uuid,
    /// Screenshot URL supplied by the buyer
    pub payment_proof: String,
    pub payment_status: PaymentStatus,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct BundlePurchase {
    pub id: Uuid,
    pub bundle_id: Uuid,
    pub buyer_id: Uuid,
    pub payment_proof: String,
    pub payment_status: PaymentStatus,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseList {
    pub files: Vec<NotesPurchase>,
    pub bundles: Vec<BundlePurchase>,
}
