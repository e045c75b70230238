//! Reset-then-start sequence for the managed datastore

use crate::cluster::certs;
use crate::cluster::managed::ResetHooks;
use crate::cluster::{Cluster, StorageBootstrap};
use crate::common::{Error, Result};
use crate::PROGRAM;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;

/// Managed datastore lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    ResetInProgress,
    ResetDone,
    Starting,
    Running,
    ResetRejected,
    ResetFailed,
    StartFailed,
}

impl LifecycleState {
    pub fn is_terminal_failure(&self) -> bool {
        matches!(
            self,
            LifecycleState::ResetRejected | LifecycleState::ResetFailed | LifecycleState::StartFailed
        )
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Uninitialized => write!(f, "uninitialized"),
            LifecycleState::ResetInProgress => write!(f, "reset-in-progress"),
            LifecycleState::ResetDone => write!(f, "reset-done"),
            LifecycleState::Starting => write!(f, "starting"),
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::ResetRejected => write!(f, "reset-rejected"),
            LifecycleState::ResetFailed => write!(f, "reset-failed"),
            LifecycleState::StartFailed => write!(f, "start-failed"),
        }
    }
}

/// Hooks the driver calls back into while it resets
struct ClusterResetHooks<'a> {
    bootstrap: &'a dyn StorageBootstrap,
    data_dir: &'a Path,
}

#[async_trait]
impl<'a> ResetHooks for ClusterResetHooks<'a> {
    async fn rebootstrap(&self) -> Result<()> {
        self.bootstrap.bootstrap().await
    }

    fn clean_certs(&self) {
        tracing::info!("Removing certificates under {}", self.data_dir.display());
        certs::clean_certs(self.data_dir);
    }
}

impl Cluster {
    /// Start the managed datastore, performing a cluster reset first if one
    /// was requested.
    ///
    /// A reset runs at most once: the driver leaves a marker file behind and a
    /// second reset request is refused while that file exists.
    pub async fn start(&self) -> Result<()> {
        let Some(driver) = self.managed.as_ref() else {
            tracing::debug!("No managed datastore, skipping start");
            return Ok(());
        };
        let reset_file = self.config.reset_file();

        if self.config.cluster_reset {
            match tokio::fs::metadata(&reset_file).await {
                Ok(_) => {
                    self.set_state(LifecycleState::ResetRejected);
                    return Err(Error::ResetAlreadyPerformed {
                        program: PROGRAM.to_string(),
                        marker: reset_file,
                    });
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    self.set_state(LifecycleState::ResetRejected);
                    return Err(e.into());
                }
            }

            self.set_state(LifecycleState::ResetInProgress);
            tracing::info!("Resetting {} datastore", driver.endpoint_name());
            let hooks = ClusterResetHooks {
                bootstrap: self.bootstrap.as_ref(),
                data_dir: &self.config.data_dir,
            };
            if let Err(e) = driver.reset(&hooks).await {
                self.set_state(LifecycleState::ResetFailed);
                return Err(e);
            }
            self.set_state(LifecycleState::ResetDone);
        }

        match tokio::fs::remove_file(&reset_file).await {
            Ok(()) => tracing::debug!("Removed {}", reset_file.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", reset_file.display(), e),
        }

        self.set_state(LifecycleState::Starting);
        if let Err(e) = driver.start(&self.access).await {
            self.set_state(LifecycleState::StartFailed);
            return Err(e);
        }
        self.set_state(LifecycleState::Running);

        Ok(())
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        *self.state.lock().unwrap()
    }

    fn set_state(&self, next: LifecycleState) {
        let mut state = self.state.lock().unwrap();
        tracing::info!("Datastore lifecycle: {} -> {}", *state, next);
        *state = next;
    }
}
