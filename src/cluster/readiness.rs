//! Datastore readiness probe

use crate::cluster::Cluster;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Delay between failed health checks
pub const READINESS_RETRY_INTERVAL: Duration = Duration::from_secs(5);

impl Cluster {
    /// Returns a receiver that resolves once the datastore answers a health
    /// check.
    ///
    /// The check is repeated every [`READINESS_RETRY_INTERVAL`] until it
    /// succeeds. If `cancel` fires first the sender is dropped and the
    /// receiver yields an error: the datastore never became ready.
    pub fn test_cluster_db(&self, cancel: CancellationToken) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let Some(driver) = self.managed.clone() else {
            let _ = tx.send(());
            return rx;
        };

        tokio::spawn(async move {
            loop {
                match driver.test().await {
                    Ok(()) => {
                        tracing::info!("{} data store connection OK", driver.endpoint_name());
                        let _ = tx.send(());
                        return;
                    }
                    Err(e) if e.is_retryable() => {
                        tracing::warn!("Failed to test data store connection: {}", e)
                    }
                    Err(e) => tracing::error!("Failed to test data store connection: {}", e),
                }

                tokio::select! {
                    _ = tokio::time::sleep(READINESS_RETRY_INTERVAL) => {}
                    _ = cancel.cancelled() => return,
                }
            }
        });

        rx
    }
}
