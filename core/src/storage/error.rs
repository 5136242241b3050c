//! Error types for store operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`Store`](super::Store) implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write store file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store document is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
