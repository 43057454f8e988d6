//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that the views directory stays inside the core root
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: KitConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::path::Component;

use crate::config::schema::KitConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("paths.views_dir: must be a non-empty relative path without '..'")]
    InvalidViewsDir,

    #[error("paths.secret_file: must not be empty")]
    EmptySecretFile,

    #[error("maps.api_base_url: {0}")]
    InvalidMapsUrl(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &KitConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.request_secs" });
    }

    let views = &config.paths.views_dir;
    let escapes = views
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if views.as_os_str().is_empty() || escapes {
        errors.push(ValidationError::InvalidViewsDir);
    }

    if config.paths.secret_file.as_os_str().is_empty() {
        errors.push(ValidationError::EmptySecretFile);
    }

    if let Some(raw) = &config.maps.api_base_url {
        match url::Url::parse(raw) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {}
            Ok(u) => errors.push(ValidationError::InvalidMapsUrl(format!(
                "unsupported scheme {:?}",
                u.scheme()
            ))),
            Err(e) => errors.push(ValidationError::InvalidMapsUrl(e.to_string())),
        }
        if config.maps.timeout_secs == 0 {
            errors.push(ValidationError::ZeroTimeout { field: "maps.timeout_secs" });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
