//! Template + partials composition.
//!
//! Every interpolation is HTML-escaped, in text and attribute position
//! alike. A value reaches the page unescaped only through the explicit
//! `safe` filter, which the shipped views use for `headScripts` alone.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::render::error::RenderError;

const TEMPLATE_EXT: &str = "html";

/// Renders `<views>/<name>.html` with the partials in `<views>/partials`.
///
/// Templates are read on every render so edits show up without a restart;
/// only head scripts are cached.
#[derive(Debug, Clone)]
pub struct TemplateComposer {
    views_dir: PathBuf,
}

impl TemplateComposer {
    pub fn new(views_dir: impl Into<PathBuf>) -> Self {
        Self {
            views_dir: views_dir.into(),
        }
    }

    pub fn views_dir(&self) -> &Path {
        &self.views_dir
    }

    pub fn partials_dir(&self) -> PathBuf {
        self.views_dir.join("partials")
    }

    /// Compose the named template with `data`.
    ///
    /// Missing keys and unknown partials render as empty strings. Only a
    /// missing templates directory, an unreadable file or a syntax error
    /// fail the render.
    pub async fn render<S: Serialize>(&self, template_name: &str, data: &S) -> Result<String, RenderError> {
        if !tokio::fs::try_exists(&self.views_dir).await.unwrap_or(false) {
            return Err(RenderError::TemplatesDirMissing(self.views_dir.clone()));
        }

        let template_path = self.views_dir.join(format!("{template_name}.{TEMPLATE_EXT}"));
        let template = read_lossy(&template_path)
            .await
            .map_err(|source| RenderError::Template {
                name: template_name.to_string(),
                source,
            })?;
        let partials = self.load_partials().await?;

        tracing::trace!(
            template = template_name,
            partials = partials.len(),
            "Composing template"
        );
        compose(&template, data, partials)
    }

    /// Every `*.html` file directly under the partials directory, keyed by
    /// file stem. A missing directory yields no partials.
    pub async fn load_partials(&self) -> Result<HashMap<String, String>, RenderError> {
        let dir = self.partials_dir();
        let partials_err = |source| RenderError::Partials {
            dir: dir.clone(),
            source,
        };

        let mut partials = HashMap::new();
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(partials),
            Err(e) => return Err(partials_err(e)),
        };

        while let Some(entry) = entries.next_entry().await.map_err(partials_err)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXT) {
                continue;
            }
            if !entry.file_type().await.map_err(partials_err)?.is_file() {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source = read_lossy(&path).await.map_err(partials_err)?;
            partials.insert(name.to_string(), source);
        }

        Ok(partials)
    }
}

/// Invalid UTF-8 is replaced rather than failing the whole page.
async fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Substitute `data` into `template`, expanding `{% include "name" %}`
/// from `partials`.
pub fn compose<S: Serialize>(
    template: &str,
    data: &S,
    partials: HashMap<String, String>,
) -> Result<String, RenderError> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.set_loader(move |name| Ok(Some(partials.get(name).cloned().unwrap_or_default())));

    Ok(env.render_str(template, data)?)
}
