use super::dto::{Actor, AdminEditRequest};
use crate::{
    application::clustering::service::ClusterEngine,
    domain::{
        complaint::{
            entity::{Complaint, ComplaintStatus},
            repository::ComplaintRepository,
        },
        shared::errors::DomainError,
    },
};
use chrono::Utc;
use std::{collections::BTreeSet, sync::Arc};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Staff triage and deletion. Every mutation that changes a cluster's
/// active membership is followed by a recompute of that cluster.
pub struct ManageComplaintsUseCase {
    complaints: Arc<dyn ComplaintRepository>,
    engine: ClusterEngine,
}

impl ManageComplaintsUseCase {
    pub fn new(complaints: Arc<dyn ComplaintRepository>, engine: ClusterEngine) -> Self {
        Self { complaints, engine }
    }

    async fn load(&self, id: Uuid) -> Result<Complaint, DomainError> {
        self.complaints
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Complaint not found".into()))
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, id: Uuid, resolver: Uuid) -> Result<Complaint, DomainError> {
        let mut complaint = self.load(id).await?;
        if complaint.solved {
            return Ok(complaint);
        }
        complaint.mark_solved(resolver, Utc::now());
        let saved = self.complaints.update(&complaint).await?;

        if let Some(cluster_id) = saved.cluster_id {
            self.engine.update_cluster_count(cluster_id).await?;
        }
        info!(complaint_id = %id, "Complaint resolved");
        Ok(saved)
    }

    /// Applies text and/or status changes. The cluster is recomputed only
    /// when the change moves the complaint across the solved boundary.
    #[instrument(skip(self, request))]
    pub async fn admin_edit(
        &self,
        id: Uuid,
        editor: Uuid,
        request: AdminEditRequest,
    ) -> Result<Complaint, DomainError> {
        request.validate()?;
        let mut complaint = self.load(id).await?;
        let was_solved = complaint.solved;

        if let Some(text) = request.original_text {
            complaint.original_text = text;
        }
        match request.status {
            Some(ComplaintStatus::Solved) => complaint.mark_solved(editor, Utc::now()),
            Some(status) => complaint.reopen(status),
            None => {}
        }

        let saved = self.complaints.update(&complaint).await?;
        match saved.cluster_id {
            Some(cluster_id) if saved.solved != was_solved => {
                self.engine.update_cluster_count(cluster_id).await?;
                self.load(id).await
            }
            _ => Ok(saved),
        }
    }

    /// Owners may delete their own complaints; staff may delete any.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid, actor: Actor) -> Result<(), DomainError> {
        let complaint = self.load(id).await?;
        if complaint.user_id != actor.user_id && !actor.is_staff {
            return Err(DomainError::Forbidden(
                "Not authorized to delete this complaint".into(),
            ));
        }

        let removed = self.complaints.delete(id).await?;
        if let Some(cluster_id) = removed.and_then(|c| c.cluster_id) {
            self.engine.update_cluster_count(cluster_id).await?;
        }
        Ok(())
    }

    /// Deletes every listed complaint that exists and recomputes each
    /// affected cluster once. Returns how many rows were removed.
    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    pub async fn bulk_delete(&self, ids: &[Uuid]) -> Result<usize, DomainError> {
        let removed = self.complaints.delete_many(ids).await?;
        let clusters: BTreeSet<Uuid> = removed.iter().filter_map(|c| c.cluster_id).collect();
        for cluster_id in &clusters {
            self.engine.update_cluster_count(*cluster_id).await?;
        }
        info!(
            deleted = removed.len(),
            clusters = clusters.len(),
            "Bulk delete complete"
        );
        Ok(removed.len())
    }
}
