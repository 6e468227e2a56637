//! CLI command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Stable command name recorded on the command span (e.g. "add", "check").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Init => "init",
        Commands::Add { .. } => "add",
        Commands::Compute { .. } => "compute",
        Commands::List { .. } => "list",
        Commands::Check { .. } => "check",
        Commands::Approve { .. } => "approve",
        Commands::Status { .. } => "status",
    }
}

/// Commands that change the ledger artifact.
pub fn is_mutating(command: &Commands) -> bool {
    matches!(
        command,
        Commands::Init | Commands::Add { .. } | Commands::Compute { .. } | Commands::Approve { .. }
    )
}
