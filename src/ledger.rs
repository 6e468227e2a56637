//! Ledger facade
//!
//! The operations a front end calls: init, add, compute, list, check, approve
//! and status. Owns the registry and wires the engine, verifier and
//! checkpointer around it.

use crate::checkpoint::Checkpointer;
use crate::config::{FictConfig, LedgerPaths};
use crate::engine::{ComputeEngine, ComputeSummary};
use crate::entry::Entry;
use crate::error::LedgerError;
use crate::hash::Toolbox;
use crate::ignore::IgnoreList;
use crate::registry::Registry;
use crate::status::StatusSummary;
use crate::tree::walker::Walker;
use crate::types::{EntryKind, EntryStatus, PRIMARY_TOOL};
use crate::verify::{IntegrityVerifier, Verdict};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of adding a path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddSummary {
    /// New entries registered
    pub added: usize,
    /// Paths ignored or already tracked
    pub skipped: usize,
}

/// Verdict for one checked entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub path: String,
    pub verdict: Verdict,
}

/// Result of an integrity check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub results: Vec<CheckResult>,
    pub passed: usize,
    pub secondary_passed: usize,
    pub failed: usize,
    /// Entries without stored fingerprints
    pub skipped: usize,
}

impl CheckReport {
    fn record(&mut self, path: String, verdict: Verdict) {
        match verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::SecondaryPass => self.secondary_passed += 1,
            Verdict::Fail => self.failed += 1,
        }
        self.results.push(CheckResult { path, verdict });
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// An opened ledger.
pub struct Ledger {
    config: FictConfig,
    paths: LedgerPaths,
    ignore: IgnoreList,
    registry: Arc<Registry>,
    toolbox: Arc<Toolbox>,
    checkpointer: Arc<Checkpointer>,
}

impl Ledger {
    /// Create the ledger directory and an empty artifact.
    ///
    /// The directory may already exist (a log file can live there); the
    /// artifact must not.
    pub fn init(workspace_root: &Path, config: &FictConfig) -> Result<LedgerPaths, LedgerError> {
        let paths = config.ledger.resolve_paths(workspace_root);
        if paths.db_file.exists() {
            return Err(LedgerError::AlreadyInitialized(paths.db_file));
        }

        fs::create_dir_all(&paths.dir).map_err(|e| {
            LedgerError::InvalidPath(format!("Failed to create {:?}: {}", paths.dir, e))
        })?;
        Checkpointer::new(paths.db_file.clone()).flush(&Registry::new())?;

        info!(path = %paths.dir.display(), "Ledger created");
        Ok(paths)
    }

    /// Open an initialized ledger and load its checkpoint.
    ///
    /// A missing or unparsable artifact opens as an empty ledger. A record with
    /// a missing field aborts the open.
    pub fn open(workspace_root: &Path, config: FictConfig) -> Result<Self, LedgerError> {
        let paths = config.ledger.resolve_paths(workspace_root);
        if !paths.dir.is_dir() {
            return Err(LedgerError::NotInitialized(paths.dir));
        }

        let checkpointer = Arc::new(Checkpointer::new(paths.db_file.clone()));
        let registry = Arc::new(Registry::new());
        let records = checkpointer.read().map_err(|e| {
            error!(path = %paths.db_file.display(), error = %e, "Ledger schema error");
            e
        })?;
        for (index, record) in records.into_iter().enumerate() {
            registry.load(index, record)?;
        }
        debug!(entries = registry.len(), path = %paths.db_file.display(), "Ledger loaded");

        let toolbox = Arc::new(Toolbox::new(config.compute.tool_timeout()));
        let ignore = IgnoreList::for_ledger(&config.ledger);

        Ok(Self {
            config,
            paths,
            ignore,
            registry,
            toolbox,
            checkpointer,
        })
    }

    /// Replace the hash toolbox, e.g. to register extra computers.
    pub fn with_toolbox(mut self, toolbox: Toolbox) -> Self {
        self.toolbox = Arc::new(toolbox);
        self
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Write the whole registry to the artifact.
    pub fn flush(&self) -> Result<usize, LedgerError> {
        self.checkpointer.flush(&self.registry).map_err(|e| {
            error!(path = %self.paths.db_file.display(), error = %e, "Could not write ledger");
            LedgerError::from(e)
        })
    }

    /// Track a file, or every path below a directory, then persist.
    ///
    /// `secondary_tool` defaults to the configured tool. Paths already tracked
    /// keep their existing entry.
    pub fn add(&self, path: &Path, secondary_tool: Option<&str>) -> Result<AddSummary, LedgerError> {
        let tool = secondary_tool.unwrap_or(&self.config.compute.secondary_tool);
        if tool == PRIMARY_TOOL {
            debug!(tool = tool, "Secondary tool matches the primary tool");
        }
        debug!(path = %path.display(), tool = tool, "Adding path");

        let mut summary = AddSummary::default();
        if path.is_file() {
            self.add_one(EntryKind::File, path, tool, &mut summary)?;
        } else if path.is_dir() {
            let walker = Walker::new(path.to_path_buf(), self.ignore.clone());
            for item in walker.walk() {
                match item {
                    Ok((kind, found)) => self.add_one(kind, &found, tool, &mut summary)?,
                    Err(e) => warn!(error = %e, "Skipping unreadable path"),
                }
            }
        } else {
            return Err(LedgerError::InvalidPath(format!(
                "Not a file or directory: {}",
                path.display()
            )));
        }

        info!(added = summary.added, skipped = summary.skipped, "Paths added");
        self.flush()?;
        Ok(summary)
    }

    fn add_one(
        &self,
        kind: EntryKind,
        path: &Path,
        tool: &str,
        summary: &mut AddSummary,
    ) -> Result<(), LedgerError> {
        if self.ignore.is_ignored(path) || self.registry.contains(path) {
            debug!(path = %path.display(), "Ignored or already tracked");
            summary.skipped += 1;
            return Ok(());
        }
        match self.registry.register(kind, path, tool) {
            Ok(_) => {}
            Err(LedgerError::InvalidPath(reason)) => {
                warn!(path = %path.display(), reason = %reason, "Path cannot be tracked, skipped");
                summary.skipped += 1;
                return Ok(());
            }
            Err(e) => return Err(e),
        }
        debug!(path = %path.display(), kind = %kind, "Added");
        summary.added += 1;
        Ok(())
    }

    /// Compute fingerprints for pending entries (all entries when `force`),
    /// then persist unconditionally.
    pub async fn compute(&self, force: bool) -> Result<ComputeSummary, LedgerError> {
        let engine = ComputeEngine::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.toolbox),
            Arc::clone(&self.checkpointer),
            self.config.compute.engine_settings(),
        );
        let summary = engine.run(self.registry.get_all(), force).await;
        self.flush()?;
        Ok(summary)
    }

    /// Every entry, in registry order.
    pub fn list(&self) -> Vec<Entry> {
        self.registry.snapshot()
    }

    /// Verify entries whose path starts with `pattern`.
    ///
    /// A pattern that matches nothing checks the whole ledger. Entries without
    /// stored fingerprints are skipped.
    pub async fn check(&self, pattern: &str) -> CheckReport {
        let verifier = IntegrityVerifier::new(Arc::clone(&self.toolbox));
        let mut report = CheckReport::default();

        for shared in self.registry.find_by_prefix(pattern) {
            let entry = shared.lock().clone();
            if !entry.status().is_verifiable() {
                report.skipped += 1;
                continue;
            }

            let verdict = verifier.verify(&entry).await;
            match verdict {
                Verdict::Pass => {
                    debug!(path = %entry.path(), tool = entry.primary_tool(), "PASS");
                }
                Verdict::SecondaryPass => {
                    error!(path = %entry.path(), tool = entry.primary_tool(), "Primary check failed");
                    info!(
                        path = %entry.path(),
                        secondary = entry.secondary_tool(),
                        primary = entry.primary_tool(),
                        "Passed secondary integrity check but failed primary"
                    );
                }
                Verdict::Fail => {
                    error!(path = %entry.path(), tool = entry.primary_tool(), "Primary check failed");
                    error!(path = %entry.path(), tool = entry.secondary_tool(), "Secondary check failed");
                }
            }
            report.record(entry.path().to_string(), verdict);
        }

        info!(
            passed = report.passed,
            secondary_passed = report.secondary_passed,
            failed = report.failed,
            skipped = report.skipped,
            "Integrity check finished"
        );
        report
    }

    /// Move every computed entry to approved.
    ///
    /// Without confirmation nothing changes and `ApprovalNotConfirmed` is
    /// returned. Returns how many entries were approved.
    pub fn approve(&self, confirmed: bool) -> Result<usize, LedgerError> {
        let entries = self.registry.get_all();
        let awaiting = entries
            .iter()
            .filter(|entry| entry.lock().status() == &EntryStatus::Computed)
            .count();

        if !confirmed {
            warn!(awaiting = awaiting, "Approval refused: not confirmed");
            return Err(LedgerError::ApprovalNotConfirmed { awaiting });
        }

        let approved = entries
            .iter()
            .filter(|entry| entry.lock().approve())
            .count();
        info!(approved = approved, "Entries approved");
        self.flush()?;
        Ok(approved)
    }

    /// Counts per state across the ledger.
    pub fn status(&self) -> StatusSummary {
        StatusSummary::from_entries(&self.registry.snapshot())
    }
}
