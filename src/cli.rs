//! CLI domain: parse, route, help, output, and presentation only.
//! No ledger logic; a single route table dispatches to the ledger facade.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{exit_code, map_error};
pub use parse::{Cli, Commands};
pub use route::{CommandOutput, RunContext};
