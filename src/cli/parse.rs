//! CLI parse: clap types for fict. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fict - file integrity checking ledger
#[derive(Parser)]
#[command(name = "fict")]
#[command(about = "Track files, record their fingerprints, and detect silent changes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (the ledger lives below it)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v', default_value = "false")]
    pub verbose: bool,

    /// Silence logging entirely
    #[arg(long, short = 'q', default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty ledger in the workspace
    Init,
    /// Track a file, or everything below a directory
    Add {
        /// File or directory to add
        path: PathBuf,

        /// Secondary hash tool for the new entries (default from config)
        #[arg(long = "hash-tool")]
        hash_tool: Option<String>,
    },
    /// Compute fingerprints for pending entries
    Compute {
        /// Reset every entry to pending and compute again
        #[arg(long)]
        recompute: bool,
    },
    /// List tracked entries
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Re-hash entries and compare against stored fingerprints
    Check {
        /// Only check paths starting with this prefix (all paths if none match)
        prefix: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Approve every computed entry
    Approve {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show counts per state
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
