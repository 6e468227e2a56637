//! Integrity verification: re-derive fingerprints and compare to stored ones.

use crate::entry::Entry;
use crate::hash::Toolbox;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of verifying one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Primary fingerprint matches.
    Pass,
    /// Primary mismatched but the secondary tool still matches. Degraded but
    /// accepted: the content hashes identically under the other algorithm.
    SecondaryPass,
    /// Neither fingerprint matches.
    Fail,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::SecondaryPass => "secondary_pass",
            Verdict::Fail => "fail",
        }
    }

    pub fn is_acceptable(&self) -> bool {
        !matches!(self, Verdict::Fail)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only verifier. Never mutates the entry it checks.
pub struct IntegrityVerifier {
    toolbox: Arc<Toolbox>,
}

impl IntegrityVerifier {
    pub fn new(toolbox: Arc<Toolbox>) -> Self {
        Self { toolbox }
    }

    /// Recompute with the entry's primary tool, falling back to its secondary
    /// tool on mismatch. A fingerprint that cannot be computed counts as a
    /// mismatch.
    pub async fn verify(&self, entry: &Entry) -> Verdict {
        let path = Path::new(entry.path());

        let primary = self.recompute(entry.primary_tool(), path).await;
        if primary.is_some() && primary.as_deref() == entry.primary_fingerprint() {
            debug!(path = %entry.path(), tool = entry.primary_tool(), "Primary fingerprint matches");
            return Verdict::Pass;
        }

        let secondary = self.recompute(entry.secondary_tool(), path).await;
        if secondary.is_some() && secondary.as_deref() == entry.secondary_fingerprint() {
            Verdict::SecondaryPass
        } else {
            Verdict::Fail
        }
    }

    async fn recompute(&self, tool: &str, path: &Path) -> Option<String> {
        match self.toolbox.fingerprint(tool, path).await {
            Ok(fingerprint) => Some(fingerprint),
            Err(e) => {
                warn!(path = %path.display(), tool = tool, error = %e, "Could not recompute fingerprint");
                None
            }
        }
    }
}
