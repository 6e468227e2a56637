//! Entry registry: the single owner of every tracked entry, keyed by normalized path.

use crate::entry::{Entry, EntryRecord};
use crate::error::LedgerError;
use crate::tree::path::normalize_path;
use crate::types::EntryKind;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Registry-mediated handle to one entry. The mutex makes each entry's fields
/// read and written as a unit.
pub type SharedEntry = Arc<Mutex<Entry>>;

#[derive(Default)]
struct RegistryInner {
    order: Vec<SharedEntry>,
    index: HashMap<String, SharedEntry>,
}

/// Path-keyed entry registry.
///
/// Insertion order is preserved so dumps are deterministic. Registering a path
/// that is already present returns the existing entry untouched.
#[derive(Default)]
pub struct Registry {
    inner: RwLock<RegistryInner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` as a pending entry, or return the entry already there.
    pub fn register(
        &self,
        kind: EntryKind,
        path: &Path,
        secondary_tool: &str,
    ) -> Result<SharedEntry, LedgerError> {
        let key = normalize_path(path)?;
        Ok(self.insert_if_absent(key, |key| Entry::new(kind, key, secondary_tool)))
    }

    /// Restore an entry from a persisted record.
    ///
    /// Goes through the same idempotent insert as [`Registry::register`], so a
    /// path repeated in the artifact keeps its first record. The restored entry
    /// carries the normalized path, not the text as written.
    pub fn load(&self, index: usize, mut record: EntryRecord) -> Result<SharedEntry, LedgerError> {
        let key = normalize_path(Path::new(&record.path))?;
        if let Some(existing) = self.inner.read().index.get(&key) {
            debug!(path = %key, "Duplicate ledger record ignored");
            return Ok(Arc::clone(existing));
        }
        if record.path != key {
            debug!(written = %record.path, path = %key, "Ledger record path normalized");
            record.path = key.clone();
        }
        let entry = Entry::from_record(index, record)?;
        Ok(self.insert_if_absent(key, move |_| entry))
    }

    fn insert_if_absent<F>(&self, key: String, build: F) -> SharedEntry
    where
        F: FnOnce(String) -> Entry,
    {
        let mut inner = self.inner.write();
        if let Some(existing) = inner.index.get(&key) {
            return Arc::clone(existing);
        }
        let entry = Arc::new(Mutex::new(build(key.clone())));
        inner.order.push(Arc::clone(&entry));
        inner.index.insert(key, Arc::clone(&entry));
        entry
    }

    pub fn contains(&self, path: &Path) -> bool {
        normalize_path(path)
            .map(|key| self.inner.read().index.contains_key(&key))
            .unwrap_or(false)
    }

    pub fn get(&self, path: &Path) -> Option<SharedEntry> {
        let key = normalize_path(path).ok()?;
        self.inner.read().index.get(&key).cloned()
    }

    /// Every entry in insertion order.
    pub fn get_all(&self) -> Vec<SharedEntry> {
        self.inner.read().order.clone()
    }

    /// Entries whose path starts with `pattern`.
    ///
    /// A pattern that matches nothing does not filter: the full set is returned.
    pub fn find_by_prefix(&self, pattern: &str) -> Vec<SharedEntry> {
        let all = self.get_all();
        let matched: Vec<SharedEntry> = all
            .iter()
            .filter(|entry| entry.lock().path().starts_with(pattern))
            .cloned()
            .collect();
        debug!(
            matched = matched.len(),
            total = all.len(),
            pattern = pattern,
            "Prefix filter applied"
        );
        if matched.is_empty() {
            all
        } else {
            matched
        }
    }

    /// Point-in-time copy of each entry (each one read under its own lock).
    pub fn snapshot(&self) -> Vec<Entry> {
        self.get_all().iter().map(|entry| entry.lock().clone()).collect()
    }

    /// Records for the checkpoint artifact, in registry order.
    pub fn dump(&self) -> Vec<EntryRecord> {
        self.get_all()
            .iter()
            .map(|entry| entry.lock().to_record())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
