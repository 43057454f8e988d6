//! Map Starter Kit page server library.

// Core subsystems
pub mod config;
pub mod http;
pub mod pages;
pub mod render;
pub mod secret;

// Collaborators
pub mod maps;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::KitConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
