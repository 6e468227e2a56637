//! Checksum programs run as subprocesses (`sha256sum`, `b2sum`, `md5sum`, ...)

use crate::error::HashError;
use crate::hash::HashComputer;
use crate::types::Fingerprint;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::error;

/// A checksum program resolved from `PATH`, invoked as `<program> <path>`.
///
/// The fingerprint is the first whitespace-delimited token of the first
/// stdout line, the `<hash>  <filename>` convention of checksum tools.
#[derive(Debug, Clone)]
pub struct ExternalTool {
    program: String,
    timeout: Option<Duration>,
}

impl ExternalTool {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn compute_error(&self, path: &Path, reason: String) -> HashError {
        HashError::Compute {
            tool: self.program.clone(),
            path: path.to_path_buf(),
            reason,
        }
    }
}

/// Extract the fingerprint token from checksum tool output.
///
/// GNU tools prefix the line with `\` when the file name needed escaping.
pub fn parse_fingerprint(stdout: &[u8]) -> Option<Fingerprint> {
    let text = String::from_utf8_lossy(stdout);
    let line = text.lines().next()?;
    let token = line.split_whitespace().next()?;
    let token = token.strip_prefix('\\').unwrap_or(token);
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[async_trait]
impl HashComputer for ExternalTool {
    fn name(&self) -> &str {
        &self.program
    }

    async fn compute(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let mut command = Command::new(&self.program);
        command
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, command.output()).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(HashError::Timeout {
                        tool: self.program.clone(),
                        path: path.to_path_buf(),
                        limit,
                    })
                }
            },
            None => command.output().await,
        };

        let output = output.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                error!(tool = %self.program, "Executable not found in PATH");
                HashError::ToolNotFound {
                    tool: self.program.clone(),
                }
            } else {
                self.compute_error(path, e.to_string())
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.compute_error(
                path,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        parse_fingerprint(&output.stdout)
            .ok_or_else(|| self.compute_error(path, "no fingerprint in output".to_string()))
    }
}
