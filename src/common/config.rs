//! Configuration for a minicluster node

use crate::common::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix overlaid on top of the config file
const ENV_PREFIX: &str = "MINICLUSTER";

/// Node configuration consumed by the managed datastore lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Node data directory (certificates live under `<data_dir>/tls`)
    pub data_dir: PathBuf,

    /// Datastore endpoint settings
    pub datastore: DatastoreConfig,

    /// Initialize a new cluster on this node
    pub cluster_init: bool,

    /// Shared secret used to join an existing cluster
    pub token: String,

    /// URL of a server to join
    pub join_url: String,

    /// Forget all peers and become sole member of a new cluster
    pub cluster_reset: bool,
}

/// Datastore endpoint. An empty endpoint means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatastoreConfig {
    pub endpoint: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,
}

impl DatastoreConfig {
    /// Scheme portion of the endpoint, i.e. everything before the first colon
    pub fn endpoint_type(&self) -> &str {
        self.endpoint
            .split_once(':')
            .map_or(self.endpoint.as_str(), |(scheme, _)| scheme)
    }
}

/// Credentials handed to a managed driver when it starts the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientAccessInfo {
    pub url: String,
    pub ca_certs: Vec<u8>,
    pub username: String,
    pub password: String,
    pub token: String,
}

impl NodeConfig {
    /// Load from an optional TOML file, then overlay `MINICLUSTER__*` env vars
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Marker file recording that a cluster reset has already been performed
    pub fn reset_file(&self) -> PathBuf {
        self.data_dir.join("db").join("reset-flag")
    }

    /// Creating or joining a cluster was requested
    pub fn wants_bootstrap(&self) -> bool {
        self.cluster_init || (!self.token.is_empty() && !self.join_url.is_empty())
    }
}
