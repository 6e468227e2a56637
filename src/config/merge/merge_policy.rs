//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key: defaults, then the global
/// file, then the workspace file, then the environment.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("ledger.dir", ".fict")?
        .set_default("ledger.db_name", "fict_db")?
        .set_default("compute.secondary_tool", "sha256sum")?
        .set_default("compute.checkpoint_interval", 1000_i64)?
        .set_default("compute.tool_timeout_secs", 600_i64)
}
