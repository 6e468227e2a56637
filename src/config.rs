//! Configuration System
//!
//! Layered configuration: built-in defaults, the global config file, the
//! workspace config file, then `FICT_*` environment overrides. Validated after
//! loading.

use crate::engine::{default_worker_count, EngineSettings};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FictConfig {
    /// Where the ledger lives and what enumeration skips
    #[serde(default)]
    pub ledger: LedgerSettings,

    /// Fingerprint computation settings
    #[serde(default)]
    pub compute: ComputeSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ledger storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Ledger directory, relative to the workspace root unless absolute
    #[serde(default = "default_ledger_dir")]
    pub dir: PathBuf,

    /// Checkpoint artifact file name inside the ledger directory
    #[serde(default = "default_db_name")]
    pub db_name: String,

    /// Additional path components to skip when adding directories
    #[serde(default)]
    pub extra_ignore: Vec<String>,
}

fn default_ledger_dir() -> PathBuf {
    PathBuf::from(".fict")
}

fn default_db_name() -> String {
    "fict_db".to_string()
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            dir: default_ledger_dir(),
            db_name: default_db_name(),
            extra_ignore: Vec::new(),
        }
    }
}

/// Resolved ledger locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPaths {
    pub dir: PathBuf,
    pub db_file: PathBuf,
}

impl LedgerSettings {
    /// Resolve the ledger directory and artifact against `workspace_root`.
    pub fn resolve_paths(&self, workspace_root: &Path) -> LedgerPaths {
        let dir = if self.dir.is_absolute() {
            self.dir.clone()
        } else {
            workspace_root.join(&self.dir)
        };
        let db_file = dir.join(&self.db_name);
        LedgerPaths { dir, db_file }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.dir.as_os_str().is_empty() {
            return Err("Ledger directory cannot be empty".to_string());
        }
        if self.db_name.trim().is_empty() {
            return Err("Ledger file name cannot be empty".to_string());
        }
        if self.db_name.contains('/') || self.db_name.contains('\\') {
            return Err(format!("Ledger file name must not contain separators: {}", self.db_name));
        }
        Ok(())
    }
}

/// Compute settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeSettings {
    /// Default secondary tool for newly added entries
    #[serde(default = "default_secondary_tool")]
    pub secondary_tool: String,

    /// Finished computations between checkpoints
    #[serde(default = "default_checkpoint_interval")]
    pub checkpoint_interval: usize,

    /// Worker count (default: available parallelism minus one)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Per-invocation limit for external hash tools, in seconds
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: Option<u64>,
}

fn default_secondary_tool() -> String {
    "sha256sum".to_string()
}

fn default_checkpoint_interval() -> usize {
    crate::engine::DEFAULT_CHECKPOINT_INTERVAL
}

fn default_tool_timeout_secs() -> Option<u64> {
    Some(600)
}

impl Default for ComputeSettings {
    fn default() -> Self {
        Self {
            secondary_tool: default_secondary_tool(),
            checkpoint_interval: default_checkpoint_interval(),
            workers: None,
            tool_timeout_secs: default_tool_timeout_secs(),
        }
    }
}

impl ComputeSettings {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            workers: self.workers.unwrap_or_else(default_worker_count),
            checkpoint_interval: self.checkpoint_interval,
        }
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.secondary_tool.trim().is_empty() {
            return Err("Secondary tool cannot be empty".to_string());
        }
        if self.checkpoint_interval == 0 {
            return Err("Checkpoint interval must be at least 1".to_string());
        }
        if self.workers == Some(0) {
            return Err("Worker count must be at least 1".to_string());
        }
        if self.tool_timeout_secs == Some(0) {
            return Err("Tool timeout must be at least 1 second".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Ledger(String),
    Compute(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Ledger(msg) => write!(f, "Ledger: {}", msg),
            ValidationError::Compute(msg) => write!(f, "Compute: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl FictConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.ledger.validate() {
            errors.push(ValidationError::Ledger(e));
        }
        if let Err(e) = self.compute.validate() {
            errors.push(ValidationError::Compute(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
