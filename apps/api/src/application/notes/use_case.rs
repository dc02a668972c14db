use super::dto::{
    CreateBundleRequest, CreateCategoryRequest, CreateFileRequest, FileAccess, PurchaseRequest,
};
use crate::domain::{
    notes::{
        entity::{
            BundlePurchase, NewNotesBundle, NewNotesCategory, NewNotesFile, NotesBundle,
            NotesCategory, NotesFile, NotesPurchase, PaymentStatus, PurchaseList,
        },
        repository::NotesRepository,
    },
    shared::errors::DomainError,
};
use chrono::Utc;
use std::{collections::HashSet, sync::Arc};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Study-notes marketplace. Payments happen off-platform; buyers upload a
/// proof and staff verify it by hand.
pub struct NotesUseCase {
    notes: Arc<dyn NotesRepository>,
}

fn parse_review_status(status: &str) -> Result<PaymentStatus, DomainError> {
    match status.parse::<PaymentStatus>() {
        Ok(PaymentStatus::Pending) | Err(_) => Err(DomainError::ValidationError(
            "Status must be 'verified' or 'rejected'".into(),
        )),
        Ok(status) => Ok(status),
    }
}

impl NotesUseCase {
    pub fn new(notes: Arc<dyn NotesRepository>) -> Self {
        Self { notes }
    }

    async fn category(&self, id: Uuid) -> Result<NotesCategory, DomainError> {
        self.notes
            .find_category(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Category not found".into()))
    }

    async fn file(&self, id: Uuid) -> Result<NotesFile, DomainError> {
        self.notes
            .find_file(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("File not found".into()))
    }

    pub async fn list_categories(&self) -> Result<Vec<NotesCategory>, DomainError> {
        self.notes.list_categories().await
    }

    #[instrument(skip(self, request))]
    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<NotesCategory, DomainError> {
        request.validate()?;
        self.notes
            .create_category(&NewNotesCategory {
                branch: request.branch.trim().to_uppercase(),
                semester: request.semester,
                subject: request.subject.trim().to_string(),
            })
            .await
    }

    pub async fn list_files(&self, category_id: Uuid) -> Result<Vec<NotesFile>, DomainError> {
        self.category(category_id).await?;
        self.notes.files_in_category(category_id).await
    }

    /// Files in a first-semester category are always free; their price is
    /// forced to zero.
    #[instrument(skip(self, request))]
    pub async fn create_file(
        &self,
        uploader: Uuid,
        request: CreateFileRequest,
    ) -> Result<NotesFile, DomainError> {
        request.validate()?;
        let category = self.category(request.category_id).await?;
        let is_free = category.is_free() || request.price == 0;

        let file = self
            .notes
            .create_file(&NewNotesFile {
                category_id: category.id,
                title: request.title.trim().to_string(),
                description: request.description,
                file_url: request.file_url,
                price: if is_free { 0 } else { request.price },
                is_free,
                uploaded_by: uploader,
            })
            .await?;
        info!(file_id = %file.id, is_free, "Notes file created");
        Ok(file)
    }

    pub async fn list_bundles(&self, category_id: Uuid) -> Result<Vec<NotesBundle>, DomainError> {
        self.category(category_id).await?;
        self.notes.bundles_in_category(category_id).await
    }

    /// Every bundled file must belong to the bundle's category.
    #[instrument(skip(self, request))]
    pub async fn create_bundle(
        &self,
        request: CreateBundleRequest,
    ) -> Result<NotesBundle, DomainError> {
        request.validate()?;
        let category = self.category(request.category_id).await?;
        for file_id in &request.file_ids {
            let file = self.file(*file_id).await?;
            if file.category_id != category.id {
                return Err(DomainError::ValidationError(format!(
                    "File {} is not in this category",
                    file_id
                )));
            }
        }

        let mut seen = HashSet::new();
        let file_ids: Vec<Uuid> = request
            .file_ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();
        self.notes
            .create_bundle(&NewNotesBundle {
                category_id: category.id,
                name: request.name.trim().to_string(),
                description: request.description,
                price: request.price,
                discount_percentage: request.discount_percentage,
                file_ids,
            })
            .await
    }

    #[instrument(skip(self, request))]
    pub async fn purchase_file(
        &self,
        file_id: Uuid,
        buyer: Uuid,
        request: PurchaseRequest,
    ) -> Result<NotesPurchase, DomainError> {
        request.validate()?;
        let file = self.file(file_id).await?;
        if file.is_free {
            return Err(DomainError::ValidationError(
                "This file is free to download".into(),
            ));
        }
        self.notes
            .create_file_purchase(file.id, buyer, &request.payment_proof)
            .await
    }

    #[instrument(skip(self, request))]
    pub async fn purchase_bundle(
        &self,
        bundle_id: Uuid,
        buyer: Uuid,
        request: PurchaseRequest,
    ) -> Result<BundlePurchase, DomainError> {
        request.validate()?;
        let bundle = self
            .notes
            .find_bundle(bundle_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Bundle not found".into()))?;
        self.notes
            .create_bundle_purchase(bundle.id, buyer, &request.payment_proof)
            .await
    }

    /// Hands out the download URL for free files, or once a direct or
    /// bundle purchase has been verified.
    #[instrument(skip(self))]
    pub async fn file_access(&self, file_id: Uuid, user: Uuid) -> Result<FileAccess, DomainError> {
        let file = self.file(file_id).await?;
        if !file.is_free && !self.notes.has_verified_access(file.id, user).await? {
            return Err(DomainError::Forbidden(
                "Purchase required to access this file".into(),
            ));
        }
        Ok(FileAccess {
            file_id: file.id,
            file_url: file.file_url,
        })
    }

    pub async fn my_purchases(&self, buyer: Uuid) -> Result<PurchaseList, DomainError> {
        self.notes.purchases_by_buyer(buyer).await
    }

    pub async fn pending_purchases(&self) -> Result<PurchaseList, DomainError> {
        self.notes.pending_purchases().await
    }

    #[instrument(skip(self))]
    pub async fn review_file_purchase(
        &self,
        purchase_id: Uuid,
        reviewer: Uuid,
        status: &str,
    ) -> Result<NotesPurchase, DomainError> {
        let status = parse_review_status(status)?;
        let purchase = self
            .notes
            .set_file_purchase_status(purchase_id, status, reviewer, Utc::now())
            .await?
            .ok_or_else(|| DomainError::NotFound("Purchase not found".into()))?;
        info!(%purchase_id, ?status, "File purchase reviewed");
        Ok(purchase)
    }

    #[instrument(skip(self))]
    pub async fn review_bundle_purchase(
        &self,
        purchase_id: Uuid,
        reviewer: Uuid,
        status: &str,
    ) -> Result<BundlePurchase, DomainError> {
        let status = parse_review_status(status)?;
        let purchase = self
            .notes
            .set_bundle_purchase_status(purchase_id, status, reviewer, Utc::now())
            .await?
            .ok_or_else(|| DomainError::NotFound("Purchase not found".into()))?;
        info!(%purchase_id, ?status, "Bundle purchase reviewed");
        Ok(purchase)
    }
}
