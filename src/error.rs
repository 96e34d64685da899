//! Error types for storage, configuration and terminal failures.
//!
//! Rejected board mutations are not errors; they are reported through
//! [`crate::kanban_board::StatusChange`] and the log.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read storage key '{key}' from {path}")]
    Read {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write storage key '{key}' to {path}")]
    Write {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage key must not be empty")]
    EmptyKey,
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("malformed board data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read seed file {path}")]
    Seed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type BoardResult<T> = Result<T, BoardError>;
