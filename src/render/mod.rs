//! Page composition subsystem.
//!
//! # Data Flow
//! ```text
//! (template name, data)
//!     → composer.rs reads <views>/<name>.html
//!     → composer.rs reads <views>/partials/*.html (missing dir = none)
//!     → minijinja substitution, includes expanded recursively
//!     → complete document or RenderError
//!
//! head_scripts.rs: <views>/partials/head-scripts/<name>.html, read once
//! ```
//!
//! # Design Decisions
//! - Missing keys render empty; templates drift independently of page data
//! - One escaping rule: everything HTML-escaped, `safe` only for fragments
//! - Head scripts cached for the process lifetime; templates are not

pub mod composer;
pub mod error;
pub mod head_scripts;

pub use composer::TemplateComposer;
pub use error::RenderError;
pub use head_scripts::HeadScriptCache;
