use crate::domain::{
    cluster::{
        entity::ClusterGroup,
        repository::ClusterRepository,
        similarity::{keyword_overlap, meets_threshold},
    },
    complaint::repository::ComplaintRepository,
    shared::{errors::DomainError, urgency::Urgency},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Result of recounting one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterRecount {
    pub cluster_id: Uuid,
    pub active_count: i64,
    pub urgency: Urgency,
}

/// Groups complaints by keyword overlap and keeps the derived urgency tier
/// on clusters and their unsolved members consistent with storage.
#[derive(Clone)]
pub struct ClusterEngine {
    clusters: Arc<dyn ClusterRepository>,
    complaints: Arc<dyn ComplaintRepository>,
}

impl ClusterEngine {
    pub fn new(
        clusters: Arc<dyn ClusterRepository>,
        complaints: Arc<dyn ComplaintRepository>,
    ) -> Self {
        Self {
            clusters,
            complaints,
        }
    }

    /// Finds the first stored cluster whose keywords overlap enough with
    /// `keywords`, or opens a new one seeded with exactly these keywords.
    ///
    /// Absent or empty keywords never produce a cluster and touch nothing.
    #[instrument(skip(self))]
    pub async fn get_or_create_cluster(
        &self,
        keywords: Option<&[String]>,
    ) -> Result<Option<ClusterGroup>, DomainError> {
        let keywords = match keywords {
            Some(k) if !k.is_empty() => k,
            _ => return Ok(None),
        };

        for cluster in self.clusters.find_all().await? {
            let overlap = keyword_overlap(keywords, &cluster.keywords);
            if meets_threshold(overlap) {
                debug!(cluster_id = %cluster.id, overlap, "Matched existing cluster");
                return Ok(Some(cluster));
            }
        }

        let cluster = self.clusters.create(keywords).await?;
        info!(cluster_id = %cluster.id, ?keywords, "Opened new cluster");
        Ok(Some(cluster))
    }

    /// Recounts the unsolved members of a cluster and writes the count and
    /// tier onto the cluster and every unsolved member.
    #[instrument(skip(self))]
    pub async fn update_cluster_count(
        &self,
        cluster_id: Uuid,
    ) -> Result<ClusterRecount, DomainError> {
        let active_count = self.complaints.count_active_in_cluster(cluster_id).await?;
        let urgency = Urgency::for_count(active_count);
        self.clusters
            .apply_active_count(cluster_id, active_count, urgency, Utc::now())
            .await?;

        debug!(%cluster_id, active_count, %urgency, "Cluster recomputed");
        Ok(ClusterRecount {
            cluster_id,
            active_count,
            urgency,
        })
    }

    /// Recomputes every stored cluster. Returns how many were processed.
    #[instrument(skip(self))]
    pub async fn recalculate_urgencies(&self) -> Result<usize, DomainError> {
        let clusters = self.clusters.find_all().await?;
        for cluster in &clusters {
            self.update_cluster_count(cluster.id).await?;
        }
        info!(clusters = clusters.len(), "Urgency sweep complete");
        Ok(clusters.len())
    }
}
