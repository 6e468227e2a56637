//! Ledger status summary: counts per state and overall progress.

use crate::entry::Entry;
use crate::types::EntryStatus;
use serde::Serialize;
use tracing::error;

/// Counts across the whole ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub pending: usize,
    pub computed: usize,
    pub approved: usize,
    /// Entries with an unrecognised status or no usable kind
    pub invalid: usize,
    /// Computed and approved over all valid entries, two decimals
    pub percent_computed: f64,
}

impl StatusSummary {
    /// Tally entries. Each invalid entry is logged so it can be inspected.
    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut summary = StatusSummary {
            total: entries.len(),
            ..StatusSummary::default()
        };

        for entry in entries {
            if entry.kind().is_none() {
                error!(path = %entry.path(), status = %entry.status(), "Bad data: entry has no usable kind");
                summary.invalid += 1;
                continue;
            }
            match entry.status() {
                EntryStatus::Pending => summary.pending += 1,
                EntryStatus::Computed => summary.computed += 1,
                EntryStatus::Approved => summary.approved += 1,
                EntryStatus::Invalid { raw } => {
                    error!(path = %entry.path(), status = %raw, "Bad data: unrecognised entry status");
                    summary.invalid += 1;
                }
            }
        }

        let done = summary.computed + summary.approved;
        let valid = done + summary.pending;
        summary.percent_computed = if valid == 0 {
            0.0
        } else {
            (done as f64 / valid as f64 * 10_000.0).round() / 100.0
        };

        summary
    }
}
