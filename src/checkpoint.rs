//! Checkpoint artifact: the registry dumped as a JSON array of entry records.
//!
//! Every flush overwrites the whole artifact (temporary file + rename). A
//! missing or unparsable artifact reads as an empty ledger; a record missing
//! one of its fields is a schema error and aborts the load.

use crate::entry::{EntryRecord, RECORD_FIELDS};
use crate::error::StorageError;
use crate::registry::Registry;
use parking_lot::Mutex;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Writes and reads the checkpoint artifact.
pub struct Checkpointer {
    path: PathBuf,
    flush_lock: Mutex<()>,
}

impl Checkpointer {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            flush_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize every entry and replace the artifact.
    ///
    /// Concurrent flushes serialize on an internal lock. Entries are read one at
    /// a time under their own locks, so the dump is per-entry consistent while
    /// computations continue. The parent directory is not created. Returns the
    /// number of records written.
    pub fn flush(&self, registry: &Registry) -> Result<usize, StorageError> {
        let _guard = self.flush_lock.lock();

        let records = registry.dump();
        let data = serde_json::to_string_pretty(&records)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;

        debug!(path = %self.path.display(), records = records.len(), "Writing ledger");

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, data).map_err(|source| StorageError::Persistence {
            path: self.path.clone(),
            source,
        })?;

        fs::rename(&temp_path, &self.path).map_err(|source| {
            let _ = fs::remove_file(&temp_path);
            StorageError::Persistence {
                path: self.path.clone(),
                source,
            }
        })?;

        Ok(records.len())
    }

    /// Read records from the artifact, in artifact order.
    pub fn read(&self) -> Result<Vec<EntryRecord>, StorageError> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No ledger artifact, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        parse_records(&self.path, &contents)
    }
}

fn parse_records(path: &Path, contents: &[u8]) -> Result<Vec<EntryRecord>, StorageError> {
    let values = match serde_json::from_slice::<Value>(contents) {
        Ok(Value::Array(values)) => values,
        Ok(_) => {
            warn!(path = %path.display(), "Ledger artifact is not a record list, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ledger artifact unparsable, starting empty");
            return Ok(Vec::new());
        }
    };

    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let Some(object) = value.as_object() else {
            return Err(StorageError::Schema {
                index,
                field: "record".to_string(),
                detail: "expected an object".to_string(),
            });
        };

        if let Some(missing) = RECORD_FIELDS.iter().find(|f| !object.contains_key(**f)) {
            return Err(StorageError::Schema {
                index,
                field: missing.to_string(),
                detail: "field missing".to_string(),
            });
        }

        let record: EntryRecord =
            serde_json::from_value(value).map_err(|e| StorageError::Schema {
                index,
                field: "record".to_string(),
                detail: e.to_string(),
            })?;
        records.push(record);
    }

    Ok(records)
}
