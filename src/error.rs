//! Error types for the dashboard synchronizer
//!
//! Only bootstrap failures reach callers. Storage failures are logged and
//! swallowed by the focus store, and undecodable stream messages are not
//! errors at all.

use std::path::PathBuf;
use thiserror::Error;

/// One of the three bootstrap reads failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {resource} failed: {source}")]
    Request {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{resource} returned HTTP {status}")]
    Status {
        resource: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("could not decode {resource}: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetch task for {resource} did not complete: {reason}")]
    Task { resource: &'static str, reason: String },
}

impl FetchError {
    /// Backend collection the failed read was for
    pub fn resource(&self) -> &'static str {
        match self {
            FetchError::Request { resource, .. }
            | FetchError::Status { resource, .. }
            | FetchError::Decode { resource, .. }
            | FetchError::Task { resource, .. } => resource,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("bootstrap failed: {0}")]
    Bootstrap(String),

    #[error("view controller has shut down")]
    Closed,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API url {url:?}: {reason}")]
    ApiUrl { url: String, reason: String },

    #[error("invalid push channel url {url:?}: {reason}")]
    WebsocketUrl { url: String, reason: String },

    #[error("no state directory given and no platform data directory available")]
    NoStateDir,
}
