//! Fingerprint computation
//!
//! A [`HashComputer`] turns a path into a fingerprint string. Variants exist
//! per concrete tool: the in-process BLAKE3 hasher and any checksum program
//! on `PATH`. The [`Toolbox`] resolves tool names to computers and applies the
//! directory sentinel, so callers never deal with concrete tools.

pub mod builtin;
pub mod external;
pub mod toolbox;

use crate::error::HashError;
use crate::types::Fingerprint;
use async_trait::async_trait;
use std::path::Path;

pub use builtin::Blake3Computer;
pub use external::ExternalTool;
pub use toolbox::Toolbox;

/// One fingerprinting tool.
#[async_trait]
pub trait HashComputer: Send + Sync {
    /// Identifier recorded in entries (`primary_tool` / `secondary_tool`).
    fn name(&self) -> &str;

    /// Fingerprint the regular file at `path`. No retries.
    async fn compute(&self, path: &Path) -> Result<Fingerprint, HashError>;
}
