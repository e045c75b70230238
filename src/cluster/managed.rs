//! Managed datastore drivers
//!
//! A driver owns the full lifecycle of one datastore backend. Drivers are
//! collected in a [`Registry`] whose order is significant: when more than one
//! driver could apply, the one registered first wins.

use crate::common::{ClientAccessInfo, NodeConfig, Result};
use async_trait::async_trait;
use axum::Router;
use std::sync::Arc;

/// Capability set of a managed datastore backend.
#[async_trait]
pub trait ManagedDriver: Send + Sync {
    /// Scheme this driver answers to in a datastore endpoint (e.g. `etcd`).
    fn endpoint_name(&self) -> &str;

    /// Whether this backend already has state on disk for this node.
    async fn is_initialized(&self, config: &NodeConfig) -> Result<bool>;

    /// Health check against the running store.
    async fn test(&self) -> Result<()>;

    /// Bring the store online for this node.
    async fn start(&self, access: &ClientAccessInfo) -> Result<()>;

    /// Discard cluster state and re-bootstrap as a fresh single member.
    ///
    /// The driver decides when (and whether) to call each hook.
    async fn reset(&self, hooks: &dyn ResetHooks) -> Result<()>;

    /// Attach management and diagnostic routes.
    async fn register(&self, config: &NodeConfig, router: Router) -> Result<Router>;

    /// Client URLs of all current cluster members.
    async fn members_client_urls(&self) -> Result<Vec<String>>;
}

/// Callbacks handed to [`ManagedDriver::reset`].
#[async_trait]
pub trait ResetHooks: Send + Sync {
    /// Re-run the storage bootstrap procedure.
    async fn rebootstrap(&self) -> Result<()>;

    /// Delete all generated certificates so they are issued again.
    fn clean_certs(&self);
}

/// Ordered list of candidate drivers plus the name of the default one.
#[derive(Clone)]
pub struct Registry {
    drivers: Vec<Arc<dyn ManagedDriver>>,
    default: String,
}

impl Registry {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            drivers: Vec::new(),
            default: default.into(),
        }
    }

    /// Append a driver. Registration order is the selection tie-break.
    pub fn register(&mut self, driver: Arc<dyn ManagedDriver>) -> &mut Self {
        self.drivers.push(driver);
        self
    }

    pub fn registered(&self) -> &[Arc<dyn ManagedDriver>] {
        &self.drivers
    }

    /// Endpoint name of the driver used when bootstrapping without an endpoint
    pub fn default_name(&self) -> &str {
        &self.default
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field(
                "drivers",
                &self
                    .drivers
                    .iter()
                    .map(|d| d.endpoint_name())
                    .collect::<Vec<_>>(),
            )
            .field("default", &self.default)
            .finish()
    }
}
