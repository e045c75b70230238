//! Client proxy kept in sync with datastore cluster membership

use crate::cluster::Cluster;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// How often cluster membership is polled
pub const MEMBERSHIP_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Request-routing proxy in front of the datastore cluster.
///
/// `update` replaces the whole address set and must not block traffic.
pub trait Proxy: Send + Sync {
    fn update(&self, addresses: Vec<String>);
}

/// Address set backed by a watch channel: one writer, any number of readers.
#[derive(Debug)]
pub struct ProxyAddresses {
    tx: watch::Sender<Vec<String>>,
}

impl ProxyAddresses {
    pub fn new(initial: Vec<String>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Snapshot of the current addresses
    pub fn addresses(&self) -> Vec<String> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every update
    pub fn subscribe(&self) -> watch::Receiver<Vec<String>> {
        self.tx.subscribe()
    }
}

impl Default for ProxyAddresses {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Proxy for ProxyAddresses {
    fn update(&self, addresses: Vec<String>) {
        self.tx.send_replace(addresses);
    }
}

impl Cluster {
    /// Poll member client URLs every [`MEMBERSHIP_POLL_INTERVAL`] and push
    /// them into `proxy`.
    ///
    /// A failed query leaves the proxy untouched until the next period. The
    /// task stops when `cancel` fires; returns `None` without a managed driver.
    pub fn setup_proxy(
        &self,
        cancel: CancellationToken,
        proxy: Arc<dyn Proxy>,
    ) -> Option<JoinHandle<()>> {
        let driver = self.managed.clone()?;

        Some(tokio::spawn(async move {
            let mut ticker = interval_at(
                Instant::now() + MEMBERSHIP_POLL_INTERVAL,
                MEMBERSHIP_POLL_INTERVAL,
            );
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("Membership proxy updater stopping");
                        return;
                    }
                    _ = ticker.tick() => {}
                }

                match driver.members_client_urls().await {
                    Ok(addresses) => proxy.update(addresses),
                    Err(e) if e.is_retryable() => {
                        tracing::warn!(
                            "failed to get {} client URLs: {}",
                            driver.endpoint_name(),
                            e
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            "failed to get {} client URLs: {}",
                            driver.endpoint_name(),
                            e
                        );
                    }
                }
            }
        }))
    }
}
