//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration (defaults when no file is given)
//! - Apply command-line overrides
//! - Resolve the core root and every derived path exactly once
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Overrides are validated like file values
//! - Nothing downstream consults the process working directory again

use std::path::{Path, PathBuf};

use crate::config::validation::validate_config;
use crate::config::{load_config, ConfigError, KitConfig, ResolvedPaths};

/// Values supplied on the command line or environment, winning over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub core_root: Option<PathBuf>,
    pub bind_address: Option<String>,
}

/// Load, override and validate the configuration, then resolve paths.
pub fn prepare(
    config_path: Option<&Path>,
    overrides: Overrides,
) -> Result<(KitConfig, ResolvedPaths), ConfigError> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => KitConfig::default(),
    };

    if let Some(root) = overrides.core_root {
        config.paths.core_root = Some(root);
    }
    if let Some(bind) = overrides.bind_address {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    let paths = ResolvedPaths::resolve(&config.paths)?;
    Ok((config, paths))
}
