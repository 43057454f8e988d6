//! Page routing subsystem.
//!
//! # Data Flow
//! ```text
//! GET /<route>
//!     → handlers.rs (request id, error mapping)
//!     → controller.rs
//!         → HeadScriptCache (page fragment)
//!         → SecretConfigReader (index, step3 pages only)
//!         → data.rs builds PageData (titles, flags, projected fields)
//!     → TemplateComposer renders <page name>.html
//!     → 200 text/html, or 500 "Error rendering template"
//! ```

pub mod controller;
pub mod data;
pub mod handlers;

pub use controller::PageController;
pub use data::{Page, PageData, SecretProjection};
