//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::LedgerError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &LedgerError) -> String {
    match e {
        LedgerError::ApprovalNotConfirmed { awaiting } => format!(
            "Approval cancelled: {} computed entries left unchanged (pass --yes to approve)",
            awaiting
        ),
        other => format!("Error: {}", other),
    }
}

/// Process exit code for a failed command.
pub fn exit_code(e: &LedgerError) -> i32 {
    match e {
        LedgerError::ApprovalNotConfirmed { .. } => 3,
        LedgerError::ConfigError(_) => 78,
        _ => 1,
    }
}
