//! # minicluster
//!
//! Lifecycle management for a node's *managed* consensus datastore:
//! - Driver selection (on-disk state, explicit endpoint, bootstrap default)
//! - Guarded one-shot cluster reset, then start
//! - Asynchronous readiness probing
//! - Management route registration on the node's HTTP router
//! - Keeping a client-side proxy in sync with cluster membership
//!
//! A datastore is *managed* when its whole lifecycle is driven from here
//! (an embedded etcd, for example). External stores reached only through a
//! connection string are not managed, and every operation becomes a no-op.
//!
//! ## Architecture

#![allow(clippy::result_large_err)]
//!
//! ```text
//!   Registry ──► resolver ──► Cluster (driver bound once)
//!                                │
//!                  start ────────┤  reset (guarded by marker) → start
//!                                │
//!        ┌───────────────────────┼────────────────────────┐
//!        ▼                       ▼                        ▼
//!   readiness prober       route registrar      membership proxy updater
//!   (one-shot signal)      (axum Router)        (30s poll → Proxy::update)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let cluster = ClusterBuilder::new(config, access, bootstrap)
//!     .build(&registry)
//!     .await?;
//! let running = cluster.run(cancel, proxy, router).await?;
//! running.ready.await.ok();
//! ```

pub mod cluster;
pub mod common;

// Re-export commonly used types
pub use cluster::{Cluster, ClusterBuilder, ManagedDriver, Registry};
pub use common::{Error, NodeConfig, Result};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Program name used in file names and operator-facing messages
pub const PROGRAM: &str = env!("CARGO_PKG_NAME");
