//! Views and secret file watcher for cache invalidation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::ResolvedPaths;
use crate::render::HeadScriptCache;
use crate::secret::SecretConfigReader;

/// Drops cached head scripts when the views change and the memoized secret
/// config when the secret file changes.
pub struct ReloadWatcher {
    views_dir: PathBuf,
    secret_file: PathBuf,
    head_scripts: Arc<HeadScriptCache>,
    secrets: Arc<SecretConfigReader>,
}

impl ReloadWatcher {
    pub fn new(
        paths: &ResolvedPaths,
        head_scripts: Arc<HeadScriptCache>,
        secrets: Arc<SecretConfigReader>,
    ) -> Self {
        Self {
            views_dir: paths.views_dir.clone(),
            secret_file: paths.secret_file.clone(),
            head_scripts,
            secrets,
        }
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive; dropping it stops watching.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let views_dir = self.views_dir.clone();
        let secret_file = self.secret_file.clone();
        let secret_parent = secret_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => self.handle(&event),
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&views_dir, RecursiveMode::Recursive)?;
        // The secret file may not exist yet; watch its directory instead.
        watcher.watch(&secret_parent, RecursiveMode::NonRecursive)?;

        tracing::info!(
            views_dir = ?views_dir,
            secret_file = ?secret_file,
            "Reload watcher started"
        );
        Ok(watcher)
    }

    fn handle(&self, event: &Event) {
        if !(event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove()) {
            return;
        }
        if touches_views(event, &self.views_dir) {
            tracing::info!("Views changed, clearing head script cache");
            self.head_scripts.invalidate_all();
        }
        if event.paths.iter().any(|p| p == &self.secret_file) {
            tracing::info!("Secret file changed, clearing memoized config");
            self.secrets.invalidate();
        }
    }
}

fn touches_views(event: &Event, views_dir: &Path) -> bool {
    event.paths.iter().any(|p| p.starts_with(views_dir))
}
