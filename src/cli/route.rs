//! CLI route: single route table and run context. Dispatches to the ledger
//! facade and presentation.

use crate::cli::help::{command_name, is_mutating};
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_add_summary, format_approved, format_check_report, format_compute_summary,
    format_entry_list, format_init_summary, format_status,
};
use crate::config::{ConfigLoader, FictConfig};
use crate::error::LedgerError;
use crate::ledger::Ledger;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::runtime::Runtime;
use crate::tree::path::normalize_path;
use tracing::{debug, info, info_span};

/// Rendered command result plus the process exit code it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub exit_code: i32,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self { text, exit_code: 0 }
    }
}

/// Runtime context for CLI execution: workspace, merged config and the async
/// runtime compute and check run on.
pub struct RunContext {
    workspace_root: PathBuf,
    config: FictConfig,
    runtime: Runtime,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, LedgerError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| LedgerError::Runtime(format!("Failed to start async runtime: {}", e)))?;

        Ok(Self {
            workspace_root,
            config,
            runtime,
        })
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, LedgerError> {
        let name = command_name(command);
        let _span = info_span!("command", name = name, mutating = is_mutating(command)).entered();
        let started = Instant::now();

        let result = self.execute_inner(command);

        info!(
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<CommandOutput, LedgerError> {
        match command {
            Commands::Init => {
                let paths = Ledger::init(&self.workspace_root, &self.config)?;
                Ok(CommandOutput::ok(format_init_summary(&paths)))
            }
            Commands::Add { path, hash_tool } => {
                let ledger = self.open()?;
                let summary = ledger.add(path, hash_tool.as_deref())?;
                Ok(CommandOutput::ok(format_add_summary(&summary)))
            }
            Commands::Compute { recompute } => {
                let ledger = self.open()?;
                let summary = self.runtime.block_on(ledger.compute(*recompute))?;
                let exit_code = if summary.failed > 0 { 2 } else { 0 };
                Ok(CommandOutput {
                    text: format_compute_summary(&summary, use_color()),
                    exit_code,
                })
            }
            Commands::List { format } => {
                let ledger = self.open()?;
                Ok(CommandOutput::ok(format_entry_list(&ledger.list(), format)?))
            }
            Commands::Check { prefix, format } => {
                let ledger = self.open()?;
                let pattern = check_pattern(prefix.as_deref());
                let report = self.runtime.block_on(ledger.check(&pattern));
                let exit_code = if report.is_clean() { 0 } else { 2 };
                Ok(CommandOutput {
                    text: format_check_report(&report, format, use_color())?,
                    exit_code,
                })
            }
            Commands::Approve { yes } => self.handle_approve(*yes),
            Commands::Status { format } => {
                let ledger = self.open()?;
                Ok(CommandOutput::ok(format_status(&ledger.status(), format, use_color())?))
            }
        }
    }

    fn handle_approve(&self, yes: bool) -> Result<CommandOutput, LedgerError> {
        let ledger = self.open()?;
        let confirmed = if yes {
            true
        } else {
            let awaiting = ledger.status().computed;
            if awaiting == 0 {
                return Ok(CommandOutput::ok(format_approved(0)));
            }
            if std::io::stdin().is_terminal() {
                use dialoguer::Confirm;
                Confirm::new()
                    .with_prompt(format!("Approve {} computed entries?", awaiting))
                    .default(false)
                    .interact()
                    .map_err(|e| {
                        LedgerError::ConfigError(format!("Failed to get user input: {}", e))
                    })?
            } else {
                false
            }
        };

        let approved = ledger.approve(confirmed)?;
        Ok(CommandOutput::ok(format_approved(approved)))
    }

    fn open(&self) -> Result<Ledger, LedgerError> {
        Ledger::open(&self.workspace_root, self.config.clone())
    }
}

/// Colour only when stdout is a terminal and `NO_COLOR` is unset.
fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Resolve a user-supplied check prefix the way tracked paths are stored.
///
/// A prefix that cannot be normalized is matched literally.
fn check_pattern(prefix: Option<&str>) -> String {
    match prefix {
        None | Some("") => String::new(),
        Some(raw) => match normalize_path(Path::new(raw)) {
            Ok(normalized) => normalized,
            Err(e) => {
                debug!(prefix = raw, error = %e, "Prefix not normalized, matching literally");
                raw.to_string()
            }
        },
    }
}
