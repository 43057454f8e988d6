//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the page server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the starter kit server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct KitConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Filesystem layout: core root, views, secret file.
    pub paths: PathsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Secret configuration lookup behaviour.
    pub secret: SecretConfigOptions,

    /// Views reload behaviour.
    pub views: ViewsConfig,

    /// Map listing collaborator.
    pub maps: MapsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Filesystem layout.
///
/// Relative `views_dir` resolves against `core_root`; relative `secret_file`
/// resolves against `working_dir`. Unset roots fall back to the process
/// working directory at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the kit's shipped files (templates, public assets).
    pub core_root: Option<PathBuf>,

    /// Templates directory, relative to the core root.
    pub views_dir: PathBuf,

    /// Directory holding user files such as `.env.secret`.
    pub working_dir: Option<PathBuf>,

    /// Secret configuration file, relative to the working directory.
    pub secret_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            core_root: None,
            views_dir: PathBuf::from("public/assets/views"),
            working_dir: None,
            secret_file: PathBuf::from(".env.secret"),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Secret configuration lookup behaviour.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SecretConfigOptions {
    /// Keep the first parsed secret file for the process lifetime
    /// (until invalidated by the reload watcher).
    pub memoize: bool,
}

/// Views reload behaviour.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ViewsConfig {
    /// Watch the views directory and secret file, dropping cached
    /// head scripts and secrets when they change.
    pub watch: bool,
}

/// Map listing collaborator settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MapsConfig {
    /// Base URL serving `/maps/list` and `/images/list`.
    /// When unset, `/maps/cards` renders an empty deck.
    pub api_base_url: Option<String>,

    /// Collaborator request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            timeout_secs: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty output for development, JSON for production.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
