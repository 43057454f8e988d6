//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → KitConfig (validated, immutable)
//!     → ResolvedPaths (core root resolved once at startup)
//!     → shared via AppState to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow running with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ResolvedPaths};
pub use schema::KitConfig;
pub use schema::{ListenerConfig, LogFormat, MapsConfig, ObservabilityConfig, PathsConfig};
