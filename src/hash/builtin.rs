//! In-process BLAKE3 hashing

use crate::error::HashError;
use crate::hash::HashComputer;
use crate::types::{Fingerprint, PRIMARY_TOOL};
use async_trait::async_trait;
use blake3::Hasher;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

const BUFFER_SIZE: usize = 64 * 1024;

/// BLAKE3 computed without a subprocess. Registered under `blake3`.
#[derive(Debug, Default, Clone)]
pub struct Blake3Computer;

impl Blake3Computer {
    pub fn new() -> Self {
        Self
    }
}

/// Stream a file through BLAKE3 and return the lowercase hex digest.
pub fn hash_file(path: &Path) -> std::io::Result<Fingerprint> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

#[async_trait]
impl HashComputer for Blake3Computer {
    fn name(&self) -> &str {
        PRIMARY_TOOL
    }

    async fn compute(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let owned: PathBuf = path.to_path_buf();
        let joined = tokio::task::spawn_blocking(move || hash_file(&owned)).await;

        match joined {
            Ok(Ok(fingerprint)) => Ok(fingerprint),
            Ok(Err(e)) => Err(HashError::Compute {
                tool: PRIMARY_TOOL.to_string(),
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
            Err(e) => Err(HashError::Compute {
                tool: PRIMARY_TOOL.to_string(),
                path: path.to_path_buf(),
                reason: format!("hashing task failed: {}", e),
            }),
        }
    }
}
