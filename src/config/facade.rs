//! Config loader: assembles sources in precedence order and validates.

use crate::config::merge::merge_policy;
use crate::config::sources::{global_file, workspace_file};
use crate::config::FictConfig;
use crate::error::LedgerError;
use config::{Environment, File};
use std::path::Path;

/// Loads [`FictConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, global file, workspace file, then `FICT_SECTION__KEY`
    /// environment variables.
    pub fn load(workspace_root: &Path) -> Result<FictConfig, LedgerError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let config: FictConfig = builder
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;
        Self::validated(config)
    }

    /// Defaults overlaid with one explicit file (must exist), then the environment.
    pub fn load_from_file(path: &Path) -> Result<FictConfig, LedgerError> {
        let config: FictConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;
        Self::validated(config)
    }

    fn environment() -> Environment {
        Environment::with_prefix("FICT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn validated(config: FictConfig) -> Result<FictConfig, LedgerError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            LedgerError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;
        Ok(config)
    }
}
