//! Error types for the fict integrity ledger.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Fingerprint computation errors.
///
/// All of these are recoverable: the caller records a null fingerprint and
/// the entry stays eligible for a later run.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("Hash tool not found on PATH: {tool}")]
    ToolNotFound { tool: String },

    #[error("Hash tool {tool} failed for {path:?}: {reason}")]
    Compute {
        tool: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Hash tool {tool} timed out after {limit:?} for {path:?}")]
    Timeout {
        tool: String,
        path: PathBuf,
        limit: Duration,
    },
}

/// Checkpoint artifact errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to persist ledger to {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize ledger: {0}")]
    Serialize(String),

    #[error("Ledger record {index} has a bad `{field}` field: {detail}")]
    Schema {
        index: usize,
        field: String,
        detail: String,
    },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid entry kind: {0} (expected 'file' or 'directory')")]
    InvalidKind(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Approval not confirmed; {awaiting} computed entries left unchanged. Re-run with --yes")]
    ApprovalNotConfirmed { awaiting: usize },

    #[error("No ledger at {0:?}. Run `fict init` first.")]
    NotInitialized(PathBuf),

    #[error("Ledger already exists at {0:?}")]
    AlreadyInitialized(PathBuf),

    #[error("Failed to walk directory: {0}")]
    Walk(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<config::ConfigError> for LedgerError {
    fn from(err: config::ConfigError) -> Self {
        LedgerError::ConfigError(err.to_string())
    }
}
