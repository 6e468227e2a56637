//! Entry: tracked state for one filesystem path, and its persisted record form.

use crate::error::{LedgerError, StorageError};
use crate::types::{EntryKind, EntryStatus, Fingerprint, PRIMARY_TOOL};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

/// Field names every persisted record must carry.
pub const RECORD_FIELDS: &[&str] = &[
    "path",
    "kind",
    "identity",
    "status",
    "created_at",
    "primary_fingerprint",
    "primary_tool",
    "secondary_fingerprint",
    "secondary_tool",
];

/// One tracked path.
///
/// Fields are only reachable through methods that keep the status and
/// fingerprint invariants intact.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    identity: String,
    path: String,
    kind: Option<EntryKind>,
    status: EntryStatus,
    created_at: Option<DateTime<Local>>,
    primary_fingerprint: Option<Fingerprint>,
    primary_tool: String,
    secondary_fingerprint: Option<Fingerprint>,
    secondary_tool: String,
}

impl Entry {
    /// New pending entry. `path` must already be normalized.
    pub fn new(kind: EntryKind, path: String, secondary_tool: &str) -> Self {
        Self {
            identity: Uuid::new_v4().to_string(),
            path,
            kind: Some(kind),
            status: EntryStatus::Pending,
            created_at: None,
            primary_fingerprint: None,
            primary_tool: PRIMARY_TOOL.to_string(),
            secondary_fingerprint: None,
            secondary_tool: secondary_tool.to_string(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> Option<EntryKind> {
        self.kind
    }

    pub fn status(&self) -> &EntryStatus {
        &self.status
    }

    pub fn created_at(&self) -> Option<DateTime<Local>> {
        self.created_at
    }

    pub fn primary_fingerprint(&self) -> Option<&str> {
        self.primary_fingerprint.as_deref()
    }

    pub fn primary_tool(&self) -> &str {
        &self.primary_tool
    }

    pub fn secondary_fingerprint(&self) -> Option<&str> {
        self.secondary_fingerprint.as_deref()
    }

    pub fn secondary_tool(&self) -> &str {
        &self.secondary_tool
    }

    /// Eligible for the compute engine: usable kind and pending.
    pub fn is_computable(&self) -> bool {
        self.kind.is_some() && self.status == EntryStatus::Pending
    }

    /// Record the outcome of one computation.
    ///
    /// Both fingerprints present moves the entry to `Computed` and stamps
    /// `created_at` the first time. Anything less leaves it `Pending` with both
    /// fingerprints cleared. Returns whether the entry is now computed.
    pub fn apply_fingerprints(
        &mut self,
        primary: Option<Fingerprint>,
        secondary: Option<Fingerprint>,
    ) -> bool {
        match (primary, secondary) {
            (Some(primary), Some(secondary)) => {
                self.primary_fingerprint = Some(primary);
                self.secondary_fingerprint = Some(secondary);
                self.status = EntryStatus::Computed;
                if self.created_at.is_none() {
                    self.created_at = Some(Local::now());
                }
                if self.kind == Some(EntryKind::File) {
                    debug!(
                        path = %self.path,
                        tool = %self.secondary_tool,
                        fingerprint = ?self.secondary_fingerprint,
                        "Entry computed"
                    );
                }
                true
            }
            _ => {
                self.primary_fingerprint = None;
                self.secondary_fingerprint = None;
                self.status = EntryStatus::Pending;
                false
            }
        }
    }

    /// Forced recompute: back to `Pending`, stored fingerprints discarded.
    pub fn reset_to_pending(&mut self) {
        self.primary_fingerprint = None;
        self.secondary_fingerprint = None;
        self.status = EntryStatus::Pending;
    }

    /// `Computed -> Approved`. Any other state is left alone.
    pub fn approve(&mut self) -> bool {
        if self.status == EntryStatus::Computed {
            self.status = EntryStatus::Approved;
            true
        } else {
            false
        }
    }

    /// Dump to the persisted record form.
    pub fn to_record(&self) -> EntryRecord {
        EntryRecord {
            path: self.path.clone(),
            kind: self.kind.map(|k| k.as_str().to_string()),
            identity: self.identity.clone(),
            status: self.status.as_str().to_string(),
            created_at: self.created_at.map(|ts| ts.to_rfc3339()),
            primary_fingerprint: self.primary_fingerprint.clone(),
            primary_tool: self.primary_tool.clone(),
            secondary_fingerprint: self.secondary_fingerprint.clone(),
            secondary_tool: self.secondary_tool.clone(),
        }
    }

    /// Restore every field from a persisted record.
    ///
    /// `index` is the record's position in the artifact, used for error reports.
    /// An unusable kind or a status that contradicts the fingerprints is kept
    /// and logged rather than repaired.
    pub fn from_record(index: usize, record: EntryRecord) -> Result<Self, StorageError> {
        let kind = match record.kind.as_deref() {
            Some(value) => match EntryKind::parse(value) {
                Ok(kind) => Some(kind),
                Err(e) => {
                    error!(path = %record.path, error = %e, "Entry restored without a usable kind");
                    None
                }
            },
            None => {
                let e = LedgerError::InvalidKind("null".to_string());
                error!(path = %record.path, error = %e, "Entry restored without a usable kind");
                None
            }
        };

        let created_at = parse_created_at(index, record.created_at.as_deref())?;

        let mut status = EntryStatus::parse(&record.status);
        let has_primary = record.primary_fingerprint.is_some();
        let has_secondary = record.secondary_fingerprint.is_some();
        let consistent = match status {
            EntryStatus::Pending => !has_primary && !has_secondary,
            EntryStatus::Computed | EntryStatus::Approved => has_primary && has_secondary,
            EntryStatus::Invalid { .. } => true,
        };
        if !consistent {
            error!(
                path = %record.path,
                status = %record.status,
                "Entry status contradicts its stored fingerprints"
            );
            status = EntryStatus::Invalid {
                raw: record.status.clone(),
            };
        }

        Ok(Self {
            identity: record.identity,
            path: record.path,
            kind,
            status,
            created_at,
            primary_fingerprint: record.primary_fingerprint,
            primary_tool: record.primary_tool,
            secondary_fingerprint: record.secondary_fingerprint,
            secondary_tool: record.secondary_tool,
        })
    }
}

fn parse_created_at(
    index: usize,
    value: Option<&str>,
) -> Result<Option<DateTime<Local>>, StorageError> {
    match value {
        None | Some("") | Some("None") => Ok(None),
        Some(text) => DateTime::parse_from_rfc3339(text)
            .map(|ts| Some(ts.with_timezone(&Local)))
            .map_err(|e| StorageError::Schema {
                index,
                field: "created_at".to_string(),
                detail: format!("unparsable timestamp {:?}: {}", text, e),
            }),
    }
}

/// Persisted form of an [`Entry`], one element of the checkpoint array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub path: String,
    pub kind: Option<String>,
    pub identity: String,
    pub status: String,
    pub created_at: Option<String>,
    pub primary_fingerprint: Option<String>,
    pub primary_tool: String,
    pub secondary_fingerprint: Option<String>,
    pub secondary_tool: String,
}
