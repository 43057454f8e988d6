//! Per-page head-script fragments.

use std::path::{Path, PathBuf};

use dashmap::DashMap;

use crate::observability::metrics;

/// Load-once cache of `<head-scripts dir>/<name>.html` fragments.
///
/// A missing fragment is cached as `""`. Entries stay until
/// [`HeadScriptCache::invalidate`] or [`HeadScriptCache::invalidate_all`].
pub struct HeadScriptCache {
    dir: PathBuf,
    entries: DashMap<String, String>,
}

impl HeadScriptCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            entries: DashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fragment for `name`, reading the disk only on first use.
    ///
    /// An empty name returns `""` and records nothing.
    pub async fn load(&self, name: &str) -> String {
        if name.is_empty() {
            return String::new();
        }

        let cached = self.entries.get(name).map(|entry| entry.value().clone());
        if let Some(script) = cached {
            metrics::record_head_script_lookup(true);
            return script;
        }
        metrics::record_head_script_lookup(false);

        let path = self.dir.join(format!("{name}.html"));
        let script = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                // Not recorded: the next request retries the read.
                tracing::warn!(name, path = %path.display(), error = %e, "Failed to read head script");
                return String::new();
            }
        };

        tracing::debug!(name, bytes = script.len(), "Head script resolved");
        self.entries.insert(name.to_string(), script.clone());
        script
    }

    /// Whether `name` has been resolved.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget one fragment so the next load re-reads it.
    pub fn invalidate(&self, name: &str) {
        self.entries.remove(name);
    }

    /// Forget every fragment.
    pub fn invalidate_all(&self) {
        self.entries.clear();
    }
}
