//! Compute engine
//!
//! Fingerprints pending entries on a bounded worker pool. Each unit of work is
//! one entry: its primary and secondary fingerprints, then the entry update.
//! Every `checkpoint_interval` finished units one worker flushes the registry.
//! The final flush after a run belongs to the caller.

use crate::checkpoint::Checkpointer;
use crate::hash::Toolbox;
use crate::registry::{Registry, SharedEntry};
use crate::types::{EntryKind, Fingerprint};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Default number of finished units between checkpoints.
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 1000;

/// Countdown that fires once every `interval` ticks.
///
/// The decrement is a single compare-and-swap, so exactly one caller observes
/// each zero transition, and the counter is reset in the same step.
#[derive(Debug)]
pub struct CheckpointCountdown {
    interval: usize,
    remaining: AtomicUsize,
}

impl CheckpointCountdown {
    pub fn new(interval: usize) -> Self {
        let interval = interval.max(1);
        Self {
            interval,
            remaining: AtomicUsize::new(interval),
        }
    }

    /// Count one finished unit. Returns true for the caller that hit zero.
    pub fn tick(&self) -> bool {
        let previous = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |remaining| {
                if remaining <= 1 {
                    Some(self.interval)
                } else {
                    Some(remaining - 1)
                }
            })
            .unwrap_or_else(|current| current);
        previous <= 1
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }
}

/// Worker count: available parallelism minus a small reserve, at least one.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

/// Engine tuning
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub workers: usize,
    pub checkpoint_interval: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            workers: default_worker_count(),
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
        }
    }
}

/// Outcome of one engine run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputeSummary {
    /// Entries dispatched to workers
    pub scheduled: usize,
    /// Entries that reached `Computed`
    pub computed: usize,
    /// Entries left `Pending` after a hashing failure
    pub failed: usize,
    /// Periodic checkpoints written during the run
    pub checkpoints: usize,
}

#[derive(Debug, Clone, Copy)]
enum UnitOutcome {
    Computed { checkpointed: bool },
    Failed { checkpointed: bool },
}

/// Schedules fingerprint computation over registry entries.
#[derive(Clone)]
pub struct ComputeEngine {
    registry: Arc<Registry>,
    toolbox: Arc<Toolbox>,
    checkpointer: Arc<Checkpointer>,
    countdown: Arc<CheckpointCountdown>,
    settings: EngineSettings,
}

impl ComputeEngine {
    pub fn new(
        registry: Arc<Registry>,
        toolbox: Arc<Toolbox>,
        checkpointer: Arc<Checkpointer>,
        settings: EngineSettings,
    ) -> Self {
        let countdown = Arc::new(CheckpointCountdown::new(settings.checkpoint_interval));
        Self {
            registry,
            toolbox,
            checkpointer,
            countdown,
            settings,
        }
    }

    /// Fingerprint every pending entry in `entries`.
    ///
    /// With `force_recompute` every entry with a usable kind is first reset to
    /// `Pending`. Entries without a usable kind are never dispatched. Per-entry
    /// failures are logged and counted; they never stop the run.
    pub async fn run(&self, entries: Vec<SharedEntry>, force_recompute: bool) -> ComputeSummary {
        let pending: Vec<SharedEntry> = entries
            .into_iter()
            .filter(|entry| {
                let mut entry = entry.lock();
                if force_recompute && entry.kind().is_some() {
                    entry.reset_to_pending();
                }
                if entry.is_computable() {
                    true
                } else {
                    debug!(path = %entry.path(), status = %entry.status(), "Not pending, skipped");
                    false
                }
            })
            .collect();

        let mut summary = ComputeSummary {
            scheduled: pending.len(),
            ..ComputeSummary::default()
        };
        if pending.is_empty() {
            info!("No pending entries to compute");
            return summary;
        }

        let workers = self.settings.workers.max(1);
        info!(
            entries = pending.len(),
            workers = workers,
            checkpoint_interval = self.settings.checkpoint_interval,
            "Starting fingerprint computation"
        );

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();

        for entry in pending {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!(error = %e, "Worker pool closed, stopping dispatch");
                    break;
                }
            };
            let engine = self.clone();
            tasks.spawn(async move {
                let outcome = engine.process(entry).await;
                drop(permit);
                outcome
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(UnitOutcome::Computed { checkpointed }) => {
                    summary.computed += 1;
                    summary.checkpoints += usize::from(checkpointed);
                }
                Ok(UnitOutcome::Failed { checkpointed }) => {
                    summary.failed += 1;
                    summary.checkpoints += usize::from(checkpointed);
                }
                Err(e) => {
                    error!(error = %e, "Compute worker panicked");
                    summary.failed += 1;
                }
            }
        }

        info!(
            computed = summary.computed,
            failed = summary.failed,
            checkpoints = summary.checkpoints,
            "Fingerprint computation finished"
        );
        summary
    }

    async fn process(&self, entry: SharedEntry) -> UnitOutcome {
        // Copy what the hashers need and release the entry while they run.
        let (path, kind, primary_tool, secondary_tool) = {
            let entry = entry.lock();
            (
                PathBuf::from(entry.path()),
                entry.kind(),
                entry.primary_tool().to_string(),
                entry.secondary_tool().to_string(),
            )
        };

        let primary = self.fingerprint(&primary_tool, &path).await;
        let secondary = self.fingerprint(&secondary_tool, &path).await;

        let computed = entry.lock().apply_fingerprints(primary, secondary);
        if computed && kind == Some(EntryKind::File) {
            debug!(path = %path.display(), "Fingerprints recorded");
        }

        let checkpointed = if self.countdown.tick() {
            self.checkpoint().await
        } else {
            false
        };

        if computed {
            UnitOutcome::Computed { checkpointed }
        } else {
            UnitOutcome::Failed { checkpointed }
        }
    }

    async fn fingerprint(&self, tool: &str, path: &std::path::Path) -> Option<Fingerprint> {
        match self.toolbox.fingerprint(tool, path).await {
            Ok(fingerprint) => Some(fingerprint),
            Err(e) => {
                warn!(path = %path.display(), tool = tool, error = %e, "Fingerprint failed, entry left pending");
                None
            }
        }
    }

    /// Periodic flush. Failure is logged; the run carries on.
    async fn checkpoint(&self) -> bool {
        let registry = Arc::clone(&self.registry);
        let checkpointer = Arc::clone(&self.checkpointer);
        let flushed =
            tokio::task::spawn_blocking(move || checkpointer.flush(&registry)).await;

        match flushed {
            Ok(Ok(records)) => {
                info!(records = records, "Checkpoint written");
                true
            }
            Ok(Err(e)) => {
                error!(error = %e, "Checkpoint failed, continuing with unpersisted state");
                false
            }
            Err(e) => {
                error!(error = %e, "Checkpoint task failed");
                false
            }
        }
    }
}
