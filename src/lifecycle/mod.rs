//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Apply overrides → Validate → Resolve paths once
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!
//! Reload (reload.rs, opt-in):
//!     views or secret file changed → invalidate caches
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then state, then listener
//! - Caches are only ever invalidated explicitly

pub mod reload;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
