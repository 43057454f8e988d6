//! Secret configuration subsystem.
//!
//! # Data Flow
//! ```text
//! <working dir>/.env.secret (optional)
//!     → reader.rs (KEY=value scan, per-field trim)
//!     → SecretConfig { map_storage_url, map_storage_api_key, upload_directory }
//!     → pages (publish flag, projected form values)
//! ```
//!
//! # Design Decisions
//! - A missing file is `None`, distinct from a file with missing keys
//! - Parsing never fails; bad lines are skipped
//! - Memoization is opt-in and invalidated explicitly

pub mod reader;

pub use reader::{SecretConfig, SecretConfigReader};
