//! Shared test utilities for integration tests

use fict::config::FictConfig;
use fict::ledger::Ledger;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Config with a fixed worker count and the in-process tool as secondary, so
/// tests do not depend on what is installed.
pub fn test_config() -> FictConfig {
    let mut config = FictConfig::default();
    config.compute.secondary_tool = "blake3".to_string();
    config.compute.workers = Some(2);
    config
}

/// Initialized and opened ledger rooted at a fresh temp directory.
pub fn open_ledger(config: FictConfig) -> (TempDir, Ledger) {
    let temp_dir = TempDir::new().unwrap();
    Ledger::init(temp_dir.path(), &config).unwrap();
    let ledger = Ledger::open(temp_dir.path(), config).unwrap();
    (temp_dir, ledger)
}

/// Reopen the ledger from its artifact, as a fresh process would.
pub fn reopen(root: &Path, config: FictConfig) -> Ledger {
    Ledger::open(root, config).unwrap()
}

pub fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// True when `tool` runs on this machine.
pub fn tool_available(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
