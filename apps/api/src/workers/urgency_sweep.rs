use crate::application::clustering::service::ClusterEngine;
use std::time::Duration;
use tracing::{error, info};

/// Periodically recomputes every cluster so urgency flags track the live
/// count of unresolved members.
pub struct UrgencySweepWorker {
    engine: ClusterEngine,
    interval_seconds: u64,
}

impl UrgencySweepWorker {
    pub fn new(engine: ClusterEngine, interval_seconds: u64) -> Self {
        Self {
            engine,
            interval_seconds: interval_seconds.max(10),
        }
    }

    pub async fn start(&self) {
        loop {
            tokio::time::sleep(Duration::from_secs(self.interval_seconds)).await;

            match self.engine.recalculate_urgencies().await {
                Ok(count) => info!(clusters = count, "Urgency sweep finished"),
                Err(e) => error!("Urgency sweep failed: {}", e),
            }
        }
    }
}
