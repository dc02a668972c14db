use super::entity::{
    BundlePurchase, NewNotesBundle, NewNotesCategory, NewNotesFile, NotesBundle, NotesCategory,
    NotesFile, NotesPurchase, PaymentStatus, PurchaseList,
};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
pub trait NotesRepository: Send + Sync {
    /// Ordered by branch, semester and subject.
    async fn list_categories(&self) -> Result<Vec<NotesCategory>, DomainError>;
    async fn find_category(&self, id: Uuid) -> Result<Option<NotesCategory>, DomainError>;
    async fn create_category(
        &self,
        category: &NewNotesCategory,
    ) -> Result<NotesCategory, DomainError>;

    async fn files_in_category(&self, category_id: Uuid) -> Result<Vec<NotesFile>, DomainError>;
    async fn find_file(&self, id: Uuid) -> Result<Option<NotesFile>, DomainError>;
    async fn create_file(&self, file: &NewNotesFile) -> Result<NotesFile, DomainError>;

    async fn bundles_in_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<NotesBundle>, DomainError>;
    async fn find_bundle(&self, id: Uuid) -> Result<Option<NotesBundle>, DomainError>;
    async fn create_bundle(&self, bundle: &NewNotesBundle) -> Result<NotesBundle, DomainError>;

    async fn create_file_purchase(
        &self,
        file_id: Uuid,
        buyer_id: Uuid,
        payment_proof: &str,
    ) -> Result<NotesPurchase, DomainError>;
    async fn create_bundle_purchase(
        &self,
        bundle_id: Uuid,
        buyer_id: Uuid,
        payment_proof: &str,
    ) -> Result<BundlePurchase, DomainError>;

    /// Returns `None` when no purchase has that id.
    async fn set_file_purchase_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        verified_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<NotesPurchase>, DomainError>;
    async fn set_bundle_purchase_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        verified_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<BundlePurchase>, DomainError>;

    /// Newest first.
    async fn purchases_by_buyer(&self, buyer_id: Uuid) -> Result<PurchaseList, DomainError>;
    /// Oldest first, so the verification queue is worked in order.
    async fn pending_purchases(&self) -> Result<PurchaseList, DomainError>;

    /// True when the buyer holds a verified purchase of the file, directly or
    /// through a bundle containing it.
    async fn has_verified_access(&self, file_id: Uuid, buyer_id: Uuid) -> Result<bool, DomainError>;
}
