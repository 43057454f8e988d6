//! Per-page data assembly and rendering.

use std::sync::Arc;
use std::time::Instant;

use crate::observability::metrics;
use crate::pages::data::{Page, PageData, SecretProjection};
use crate::render::{HeadScriptCache, RenderError, TemplateComposer};
use crate::secret::SecretConfigReader;

/// Assembles [`PageData`] for a page and renders its template.
pub struct PageController {
    composer: TemplateComposer,
    head_scripts: Arc<HeadScriptCache>,
    secrets: Arc<SecretConfigReader>,
}

impl PageController {
    pub fn new(
        composer: TemplateComposer,
        head_scripts: Arc<HeadScriptCache>,
        secrets: Arc<SecretConfigReader>,
    ) -> Self {
        Self {
            composer,
            head_scripts,
            secrets,
        }
    }

    pub fn composer(&self) -> &TemplateComposer {
        &self.composer
    }

    pub fn head_scripts(&self) -> &Arc<HeadScriptCache> {
        &self.head_scripts
    }

    pub fn secrets(&self) -> &Arc<SecretConfigReader> {
        &self.secrets
    }

    /// Gather head script, titles and secret projection for `page`.
    ///
    /// The secret file is only consulted by pages that project from it.
    pub async fn page_data(&self, page: Page) -> PageData {
        let head_scripts = match page.head_script() {
            Some(name) => self.head_scripts.load(name).await,
            None => String::new(),
        };

        let secret = match page.secret_projection() {
            SecretProjection::None => None,
            _ => self.secrets.get_secret_config().await,
        };

        PageData::for_page(page, head_scripts, secret.as_ref())
    }

    /// Render `page` to a complete document.
    pub async fn render(&self, page: Page) -> Result<String, RenderError> {
        let start = Instant::now();
        let data = self.page_data(page).await;
        let result = self.composer.render(page.name(), &data).await;
        metrics::record_page_render(page.name(), result.is_ok(), start);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn controller(root: &Path) -> PageController {
        let views = root.join("views");
        PageController::new(
            TemplateComposer::new(&views),
            Arc::new(HeadScriptCache::new(views.join("partials/head-scripts"))),
            Arc::new(SecretConfigReader::new(root.join(".env.secret"), false)),
        )
    }

    #[tokio::test]
    async fn test_page_data_reads_head_script() {
        let dir = tempfile::tempdir().unwrap();
        let scripts = dir.path().join("views/partials/head-scripts");
        fs::create_dir_all(&scripts).unwrap();
        fs::write(scripts.join("background-fade.html"), "<script>fade()</script>").unwrap();
        let controller = controller(dir.path());

        let data = controller.page_data(Page::Step4Validated).await;
        assert_eq!(data.head_scripts, "<script>fade()</script>");
        assert!(controller.head_scripts().contains("background-fade"));

        let data = controller.page_data(Page::Step2Hosting).await;
        assert_eq!(data.head_scripts, "");
    }

    #[tokio::test]
    async fn test_step3_projects_secret_fields() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".env.secret"),
            "MAP_STORAGE_URL= https://storage.example \nUPLOAD_DIRECTORY=maps\n",
        )
        .unwrap();
        let controller = controller(dir.path());

        let data = controller.page_data(Page::Step3Steps).await;
        assert_eq!(data.map_storage_url.as_deref(), Some("https://storage.example"));
        assert_eq!(data.map_storage_api_key.as_deref(), Some(""));
        assert_eq!(data.upload_directory.as_deref(), Some("maps"));
    }

    #[tokio::test]
    async fn test_render_missing_views_fails() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller(dir.path());
        assert!(matches!(
            controller.render(Page::Index).await,
            Err(RenderError::TemplatesDirMissing(_))
        ));
    }

    #[tokio::test]
    async fn test_render_uses_page_name_as_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("views")).unwrap();
        fs::write(
            dir.path().join("views/step4-validated-selfhosted.html"),
            "<title>{{ metaTitle }}</title><h1>{{ pageTitle }}</h1>",
        )
        .unwrap();
        let controller = controller(dir.path());

        let html = controller.render(Page::Step4ValidatedSelfHosted).await.unwrap();
        assert_eq!(
            html,
            "<title>WorkAdventure Starter Kit - Self-hosted</title><h1>Your maps - Self-hosted</h1>"
        );
    }
}
