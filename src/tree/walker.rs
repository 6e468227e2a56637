//! Filesystem walker for enumerating paths to track

use crate::error::LedgerError;
use crate::ignore::IgnoreList;
use crate::types::EntryKind;
use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;

/// Filesystem walker
///
/// Symbolic links are never followed.
pub struct Walker {
    root: PathBuf,
    ignore: IgnoreList,
}

impl Walker {
    pub fn new(root: PathBuf, ignore: IgnoreList) -> Self {
        Self { root, ignore }
    }

    /// Lazily yield `(kind, path)` for everything under the root.
    ///
    /// The root itself is skipped, as are ignored paths and anything that is
    /// neither a regular file nor a directory. Ignored directories are pruned.
    pub fn walk(&self) -> impl Iterator<Item = Result<(EntryKind, PathBuf), LedgerError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .min_depth(1)
            .into_iter()
            .filter_entry(move |entry| {
                let ignored = self.ignore.is_ignored(entry.path());
                if ignored {
                    debug!(path = %entry.path().display(), "Ignored path");
                }
                !ignored
            })
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(LedgerError::Walk(e.to_string()))),
                };
                let file_type = entry.file_type();
                if file_type.is_dir() {
                    Some(Ok((EntryKind::Directory, entry.into_path())))
                } else if file_type.is_file() {
                    Some(Ok((EntryKind::File, entry.into_path())))
                } else {
                    None
                }
            })
    }
}
