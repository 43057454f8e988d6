//! Configuration loading from disk and path resolution.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{KitConfig, PathsConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<KitConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: KitConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Absolute locations every file-resolving component works from.
///
/// Resolved once at startup and handed to the components; nothing re-reads
/// the process working directory afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub core_root: PathBuf,
    pub views_dir: PathBuf,
    pub secret_file: PathBuf,
}

impl ResolvedPaths {
    /// Resolve the configured layout against the process working directory.
    pub fn resolve(paths: &PathsConfig) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir()?;
        Ok(Self::resolve_from(paths, &cwd))
    }

    /// Resolve the configured layout against an explicit fallback directory.
    pub fn resolve_from(paths: &PathsConfig, cwd: &Path) -> Self {
        let core_root = absolutize(paths.core_root.as_deref(), cwd);
        let working_dir = absolutize(paths.working_dir.as_deref(), cwd);
        Self {
            views_dir: core_root.join(&paths.views_dir),
            secret_file: working_dir.join(&paths.secret_file),
            core_root,
        }
    }

    /// Directory holding reusable partials.
    pub fn partials_dir(&self) -> PathBuf {
        self.views_dir.join("partials")
    }

    /// Directory holding per-page head-script fragments.
    pub fn head_scripts_dir(&self) -> PathBuf {
        self.partials_dir().join("head-scripts")
    }
}

fn absolutize(path: Option<&Path>, cwd: &Path) -> PathBuf {
    match path {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => cwd.join(p),
        None => cwd.to_path_buf(),
    }
}
