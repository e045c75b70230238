//! Common utilities and types shared across minicluster

pub mod config;
pub mod error;

pub use config::{ClientAccessInfo, DatastoreConfig, NodeConfig};
pub use error::{Error, Result};
