//! Common error types for upmanifest.

use std::path::PathBuf;
use thiserror::Error;

/// Common error type for upmanifest operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported OS: {0}")]
    UnsupportedOs(String),

    #[error("Cannot read metadata of {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scan of {root} failed: {reason}")]
    Scan { root: PathBuf, reason: String },

    #[error("Invalid pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias using common Error.
pub type Result<T> = std::result::Result<T, Error>;

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Other(e.to_string())
    }
}
