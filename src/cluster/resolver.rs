//! Managed driver selection

use crate::cluster::managed::{ManagedDriver, Registry};
use crate::common::{NodeConfig, Result};
use std::sync::Arc;

/// Pick the managed driver for this node, if any.
///
/// 1. A driver with state already on disk is used.
/// 2. Otherwise a driver whose endpoint name matches the configured endpoint
///    scheme is used. Downstreams rely on this to force a driver.
/// 3. Otherwise, with no endpoint configured and a cluster init or join
///    requested, the registry's default driver is used.
///
/// `Ok(None)` means the node talks to an externally operated datastore.
/// Any error from an on-disk probe aborts selection.
pub async fn assign_managed_driver(
    registry: &Registry,
    config: &NodeConfig,
) -> Result<Option<Arc<dyn ManagedDriver>>> {
    if registry.is_empty() {
        tracing::debug!("No managed datastore drivers registered");
        return Ok(None);
    }

    for driver in registry.registered() {
        if driver.is_initialized(config).await? {
            tracing::info!(
                "Found initialized {} datastore on disk",
                driver.endpoint_name()
            );
            return Ok(Some(driver.clone()));
        }
    }

    let endpoint_type = config.datastore.endpoint_type();
    if let Some(driver) = find(registry, endpoint_type) {
        tracing::info!("Using {} datastore from configured endpoint", endpoint_type);
        return Ok(Some(driver));
    }

    if config.datastore.endpoint.is_empty() && config.wants_bootstrap() {
        if let Some(driver) = find(registry, registry.default_name()) {
            tracing::info!(
                "Using default {} datastore to bootstrap cluster",
                driver.endpoint_name()
            );
            return Ok(Some(driver));
        }
    }

    tracing::debug!("No managed datastore driver selected");
    Ok(None)
}

fn find(registry: &Registry, name: &str) -> Option<Arc<dyn ManagedDriver>> {
    registry
        .registered()
        .iter()
        .find(|d| d.endpoint_name() == name)
        .cloned()
}
