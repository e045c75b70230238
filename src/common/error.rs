//! Error types for minicluster

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Lifecycle Errors ===
    #[error(
        "cluster-reset was successfully performed, please remove the cluster-reset flag and start {program} normally, \
         if you need to perform another cluster reset, you must first manually delete the {} file",
        .marker.display()
    )]
    ResetAlreadyPerformed { program: String, marker: PathBuf },

    #[error("Storage bootstrap failed: {0}")]
    Bootstrap(String),

    // === Driver Errors ===
    #[error("Datastore driver error: {0}")]
    Driver(String),

    #[error("Datastore unavailable: {0}")]
    Unavailable(String),

    // === Config Errors ===
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    // === Generic ===
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Is this a retryable error?
    ///
    /// Only connectivity failures qualify; everything else aborts the phase
    /// that produced it.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Unavailable(_))
    }
}

// Implement From for common error types
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Other(e.to_string())
    }
}
