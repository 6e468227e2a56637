//! Core value types shared across the ledger.

use crate::error::LedgerError;
use std::fmt;

/// A fingerprint as printed by a checksum tool (lowercase hex for the built-ins).
pub type Fingerprint = String;

/// Fingerprint recorded for directories. They are tracked for structure only.
pub const DIRECTORY_FINGERPRINT: &str = "directory";

/// The standard tool every entry is anchored to. Not user selectable.
pub const PRIMARY_TOOL: &str = "blake3";

/// Kind of filesystem path an entry tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }

    /// Parse a kind from its persisted name. Only the closed set is accepted.
    pub fn parse(value: &str) -> Result<Self, LedgerError> {
        match value {
            "file" => Ok(EntryKind::File),
            "directory" => Ok(EntryKind::Directory),
            other => Err(LedgerError::InvalidKind(other.to_string())),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry status state machine.
///
/// `Pending -> Computed -> Approved`, with a forced recompute taking any state
/// back to `Pending`. `Invalid` holds a persisted value that is unknown or
/// contradicts the fingerprint fields; it is reported, never coerced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    Pending,
    Computed,
    Approved,
    Invalid { raw: String },
}

impl EntryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Computed => "computed",
            EntryStatus::Approved => "approved",
            EntryStatus::Invalid { raw } => raw.as_str(),
        }
    }

    /// Parse a persisted status; unknown values become `Invalid`.
    pub fn parse(value: &str) -> Self {
        match value {
            "pending" => EntryStatus::Pending,
            "computed" => EntryStatus::Computed,
            "approved" => EntryStatus::Approved,
            other => EntryStatus::Invalid {
                raw: other.to_string(),
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, EntryStatus::Invalid { .. })
    }

    /// Whether stored fingerprints exist and can be re-verified.
    pub fn is_verifiable(&self) -> bool {
        matches!(self, EntryStatus::Computed | EntryStatus::Approved)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
