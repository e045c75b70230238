//! Managed datastore lifecycle for a cluster node
//!
//! The cluster is responsible for:
//! - Choosing a managed driver (or none) once at startup
//! - Reset (at most once) and start of the datastore
//! - Readiness signalling for dependent subsystems
//! - Management route registration
//! - Keeping the datastore proxy's member list current

pub mod certs;
pub mod lifecycle;
pub mod managed;
pub mod proxy;
pub mod readiness;
pub mod resolver;
pub mod routes;

pub use lifecycle::LifecycleState;
pub use managed::{ManagedDriver, Registry, ResetHooks};
pub use proxy::{Proxy, ProxyAddresses};

use crate::common::{ClientAccessInfo, NodeConfig, Result};
use async_trait::async_trait;
use axum::Router;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Storage bootstrap procedure, re-run by a driver during reset
#[async_trait]
pub trait StorageBootstrap: Send + Sync {
    async fn bootstrap(&self) -> Result<()>;
}

/// Collects what a [`Cluster`] needs before its driver is chosen.
pub struct ClusterBuilder {
    config: NodeConfig,
    access: ClientAccessInfo,
    bootstrap: Arc<dyn StorageBootstrap>,
}

impl ClusterBuilder {
    pub fn new(
        config: NodeConfig,
        access: ClientAccessInfo,
        bootstrap: Arc<dyn StorageBootstrap>,
    ) -> Self {
        Self {
            config,
            access,
            bootstrap,
        }
    }

    /// Resolve the managed driver and freeze the binding.
    pub async fn build(self, registry: &Registry) -> Result<Cluster> {
        let managed = resolver::assign_managed_driver(registry, &self.config).await?;

        Ok(Cluster {
            config: self.config,
            access: self.access,
            bootstrap: self.bootstrap,
            managed,
            state: Mutex::new(LifecycleState::Uninitialized),
        })
    }
}

/// A node's datastore context. The driver binding never changes after build.
pub struct Cluster {
    config: NodeConfig,
    access: ClientAccessInfo,
    bootstrap: Arc<dyn StorageBootstrap>,
    managed: Option<Arc<dyn ManagedDriver>>,
    state: Mutex<LifecycleState>,
}

/// Handles returned by [`Cluster::run`]
pub struct Running {
    /// Router with the driver's routes attached
    pub router: Router,
    /// Resolves once the datastore passes a health check
    pub ready: oneshot::Receiver<()>,
    /// Membership proxy updater, if a driver is managed
    pub proxy_task: Option<JoinHandle<()>>,
}

impl Cluster {
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn managed_driver(&self) -> Option<&Arc<dyn ManagedDriver>> {
        self.managed.as_ref()
    }

    pub fn is_managed(&self) -> bool {
        self.managed.is_some()
    }

    /// Start the datastore and register management routes, then launch the
    /// readiness probe and proxy updater.
    ///
    /// Background tasks are only spawned once every fallible step succeeded.
    pub async fn run(
        &mut self,
        cancel: CancellationToken,
        proxy: Arc<dyn Proxy>,
        router: Router,
    ) -> Result<Running> {
        self.start().await?;
        let router = self.init_cluster_db(router).await?;

        let ready = self.test_cluster_db(cancel.clone());
        let proxy_task = self.setup_proxy(cancel, proxy);

        Ok(Running {
            router,
            ready,
            proxy_task,
        })
    }
}

impl std::fmt::Debug for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cluster")
            .field("data_dir", &self.config.data_dir)
            .field(
                "managed",
                &self.managed_driver().map(|d| d.endpoint_name().to_string()),
            )
            .field("state", &self.lifecycle_state())
            .finish()
    }
}
