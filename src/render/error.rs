use std::path::PathBuf;

/// Failures that make a page impossible to compose.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The templates directory is absent: a broken deployment.
    #[error("templates directory not found: {}", .0.display())]
    TemplatesDirMissing(PathBuf),

    #[error("failed to read template {name:?}: {source}")]
    Template {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read partials from {}: {source}", .dir.display())]
    Partials {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template engine error: {0}")]
    Engine(#[from] minijinja::Error),
}
