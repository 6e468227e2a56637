//! Ignore list for directory enumeration.
//!
//! The ledger never tracks its own storage directory or artifact, nor the
//! metadata directories some filesystems and NAS appliances scatter around.
//! Patterns are matched against whole path components.

use crate::config::LedgerSettings;
use std::path::{Component, Path};

/// Filesystem metadata directories that are never tracked.
const BUILTIN_DEFAULTS: &[&str] = &["@eaDir", ".Spotlight-V100", ".fseventsd"];

/// Compiled ignore list
#[derive(Debug, Clone)]
pub struct IgnoreList {
    patterns: Vec<String>,
}

impl IgnoreList {
    /// Built-ins plus the ledger's own directory and artifact names.
    pub fn for_ledger(settings: &LedgerSettings) -> Self {
        let mut patterns: Vec<String> = BUILTIN_DEFAULTS.iter().map(|p| p.to_string()).collect();

        if let Some(name) = settings.dir.file_name() {
            patterns.push(name.to_string_lossy().into_owned());
        }
        patterns.push(settings.db_name.clone());
        patterns.extend(settings.extra_ignore.iter().cloned());
        patterns.sort();
        patterns.dedup();

        Self { patterns }
    }

    /// True when any component of `path` equals an ignore pattern.
    pub fn is_ignored(&self, path: &Path) -> bool {
        path.components().any(|component| match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                self.patterns.iter().any(|p| p.as_str() == name)
            }
            _ => false,
        })
    }
}
