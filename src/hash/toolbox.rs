//! Tool name resolution and the directory sentinel

use crate::error::HashError;
use crate::hash::{Blake3Computer, ExternalTool, HashComputer};
use crate::types::{Fingerprint, DIRECTORY_FINGERPRINT};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Maps tool names to computers.
///
/// Registered computers win; any other name is treated as an executable on
/// `PATH`. `blake3` is always registered.
pub struct Toolbox {
    computers: HashMap<String, Arc<dyn HashComputer>>,
    timeout: Option<Duration>,
}

impl Toolbox {
    /// Toolbox with the built-in computers; `timeout` bounds each subprocess.
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut computers: HashMap<String, Arc<dyn HashComputer>> = HashMap::new();
        let blake3: Arc<dyn HashComputer> = Arc::new(Blake3Computer::new());
        computers.insert(blake3.name().to_string(), blake3);
        Self { computers, timeout }
    }

    /// Register (or replace) a computer under its own name.
    pub fn with_computer(mut self, computer: Arc<dyn HashComputer>) -> Self {
        self.computers.insert(computer.name().to_string(), computer);
        self
    }

    pub fn resolve(&self, tool: &str) -> Arc<dyn HashComputer> {
        match self.computers.get(tool) {
            Some(computer) => Arc::clone(computer),
            None => Arc::new(ExternalTool::new(tool, self.timeout)),
        }
    }

    /// Fingerprint `path` with `tool`.
    ///
    /// Directories get the sentinel without running anything.
    pub async fn fingerprint(&self, tool: &str, path: &Path) -> Result<Fingerprint, HashError> {
        if path.is_dir() {
            return Ok(DIRECTORY_FINGERPRINT.to_string());
        }
        self.resolve(tool).compute(path).await
    }
}

impl Default for Toolbox {
    fn default() -> Self {
        Self::new(None)
    }
}
