//! Management route registration

use crate::cluster::Cluster;
use crate::common::{DatastoreConfig, Result};
use axum::Router;

impl Cluster {
    /// Let the managed driver attach its routes to `router`.
    ///
    /// An endpoint not already addressed to the driver's scheme is replaced by
    /// the bare driver name, dropping any other datastore settings.
    pub async fn init_cluster_db(&mut self, router: Router) -> Result<Router> {
        let Some(driver) = self.managed.clone() else {
            return Ok(router);
        };

        let prefix = format!("{}://", driver.endpoint_name());
        if !self.config.datastore.endpoint.starts_with(&prefix) {
            self.config.datastore = DatastoreConfig {
                endpoint: driver.endpoint_name().to_string(),
                ..Default::default()
            };
        }

        driver.register(&self.config, router).await
    }
}
