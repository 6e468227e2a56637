//! Path normalization for registry keys

use crate::error::LedgerError;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Normalize a path into the registry key form.
///
/// This function:
/// 1. Makes the path absolute against the current directory
/// 2. Resolves `.` and `..` lexically (the path need not exist)
/// 3. Normalizes Unicode to NFC
/// 4. Removes trailing slashes (except root)
///
/// Paths that are not valid UTF-8 are rejected rather than converted lossily,
/// so two distinct names can never share a key.
pub fn normalize_path(path: &Path) -> Result<String, LedgerError> {
    if path.as_os_str().is_empty() {
        return Err(LedgerError::InvalidPath("empty path".to_string()));
    }

    let absolute = std::path::absolute(path).map_err(|e| {
        LedgerError::InvalidPath(format!("Failed to resolve {:?}: {}", path, e))
    })?;

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }

    // Strip Windows verbatim prefixes where that is lossless
    let cleaned = dunce::simplified(&cleaned).to_path_buf();

    let text = cleaned.to_str().ok_or_else(|| {
        LedgerError::InvalidPath(format!("Path is not valid UTF-8: {:?}", path))
    })?;
    Ok(normalize_path_string(text))
}

/// Normalize a path string without filesystem access.
pub fn normalize_path_string(path: &str) -> String {
    let mut result: String = path.nfc().collect();

    if result.len() > 1 {
        while result.ends_with('/') || result.ends_with('\\') {
            result.pop();
        }
    }

    result
}
