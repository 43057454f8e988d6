//! Map listing and publishing collaborators.
//!
//! # Data Flow
//! ```text
//! GET /maps/cards
//!     → catalog.rs GET <maps api>/maps/list  (failure → [])
//!     → catalog.rs GET <maps api>/images/list (only if no map has an image)
//!     → cards.rs (image normalization, placeholder, description fallback)
//!     → TemplateComposer renders map-cards.html
//!
//! kit-cli publish
//!     → publish.rs POST <server>/uploader/upload
//!     → PublishOutcome (redirect, or user-facing message)
//! ```

pub mod cards;
pub mod catalog;
pub mod handlers;
pub mod publish;

pub use cards::{build_cards, needs_fallback_images, CardDeck, MapCard};
pub use catalog::{MapDescriptor, MapsClient, MapsError};
pub use publish::{PublishClient, PublishOutcome};
