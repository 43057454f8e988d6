//! `.env.secret` lookup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;

const MAP_STORAGE_URL: &str = "MAP_STORAGE_URL";
const MAP_STORAGE_API_KEY: &str = "MAP_STORAGE_API_KEY";
const UPLOAD_DIRECTORY: &str = "UPLOAD_DIRECTORY";

/// Publishing settings parsed from the secret file.
///
/// Each field is independently optional; a present but blank value is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    pub map_storage_url: Option<String>,
    pub map_storage_api_key: Option<String>,
    pub upload_directory: Option<String>,
}

impl SecretConfig {
    /// Parse `KEY=value` lines. Unknown and malformed lines are ignored.
    pub fn parse(content: &str) -> Self {
        Self {
            map_storage_url: find_value(content, MAP_STORAGE_URL),
            map_storage_api_key: find_value(content, MAP_STORAGE_API_KEY),
            upload_directory: find_value(content, UPLOAD_DIRECTORY),
        }
    }

    /// True when every publishing setting is present.
    pub fn is_complete(&self) -> bool {
        [
            &self.map_storage_url,
            &self.map_storage_api_key,
            &self.upload_directory,
        ]
        .iter()
        .all(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }
}

/// Value of the first line containing `KEY=` followed by at least one
/// character. Lines where nothing follows the `=` are skipped.
fn find_value(content: &str, key: &str) -> Option<String> {
    let needle = format!("{key}=");
    content.lines().find_map(|line| {
        let start = line.find(&needle)? + needle.len();
        let rest = &line[start..];
        if rest.is_empty() {
            return None;
        }
        Some(rest.trim().to_string())
    })
    .filter(|v| !v.is_empty())
}

/// Reads the optional secret file.
///
/// Re-reads on every call unless constructed with memoization, in which case
/// the first result is kept until [`SecretConfigReader::invalidate`].
pub struct SecretConfigReader {
    path: PathBuf,
    memoize: bool,
    memo: ArcSwapOption<Option<SecretConfig>>,
}

impl SecretConfigReader {
    pub fn new(path: impl Into<PathBuf>, memoize: bool) -> Self {
        Self {
            path: path.into(),
            memoize,
            memo: ArcSwapOption::empty(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the file does not exist. Never fails: unreadable content
    /// degrades to a record with every field absent.
    pub async fn get_secret_config(&self) -> Option<SecretConfig> {
        if self.memoize {
            if let Some(cached) = self.memo.load_full() {
                return (*cached).clone();
            }
        }

        let lookup = self.read().await;
        if self.memoize {
            self.memo.store(Some(Arc::new(lookup.clone())));
        }
        lookup
    }

    pub async fn is_publishing_configured(&self) -> bool {
        self.get_secret_config()
            .await
            .is_some_and(|config| config.is_complete())
    }

    /// Drop the memoized lookup, if any.
    pub fn invalidate(&self) {
        if self.memo.swap(None).is_some() {
            tracing::debug!(path = %self.path.display(), "Secret config memo cleared");
        }
    }

    async fn read(&self) -> Option<SecretConfig> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Some(SecretConfig::parse(&String::from_utf8_lossy(&bytes))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Secret config present but unreadable"
                );
                Some(SecretConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "MAP_STORAGE_URL= https://maps.example.com \n\
                        MAP_STORAGE_API_KEY=abc123\n\
                        UPLOAD_DIRECTORY=my-world\n";

    #[test]
    fn test_parse_trims_values() {
        let config = SecretConfig::parse(FULL);
        assert_eq!(config.map_storage_url.as_deref(), Some("https://maps.example.com"));
        assert_eq!(config.map_storage_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.upload_directory.as_deref(), Some("my-world"));
        assert!(config.is_complete());
    }

    #[test]
    fn test_parse_ignores_noise() {
        let config = SecretConfig::parse("# comment\ngarbage line\n=\nUPLOAD_DIRECTORY=dir\r\n");
        assert_eq!(config.map_storage_url, None);
        assert_eq!(config.map_storage_api_key, None);
        assert_eq!(config.upload_directory.as_deref(), Some("dir"));
        assert!(!config.is_complete());
    }

    #[test]
    fn test_parse_blank_value_is_absent() {
        let config = SecretConfig::parse("MAP_STORAGE_URL=   \nMAP_STORAGE_API_KEY=k\nUPLOAD_DIRECTORY=d\n");
        assert_eq!(config.map_storage_url, None);
        assert!(!config.is_complete());
    }

    #[test]
    fn test_parse_skips_bare_key_line() {
        let config = SecretConfig::parse("MAP_STORAGE_URL=\nMAP_STORAGE_URL=https://later\n");
        assert_eq!(config.map_storage_url.as_deref(), Some("https://later"));
    }

    #[test]
    fn test_value_keeps_inner_equals() {
        let config = SecretConfig::parse("MAP_STORAGE_API_KEY=a=b=c\n");
        assert_eq!(config.map_storage_api_key.as_deref(), Some("a=b=c"));
    }

    #[tokio::test]
    async fn test_absent_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let reader = SecretConfigReader::new(dir.path().join(".env.secret"), false);
        assert_eq!(reader.get_secret_config().await, None);
        assert!(!reader.is_publishing_configured().await);
    }

    #[tokio::test]
    async fn test_present_but_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env.secret");
        std::fs::write(&path, "").unwrap();
        let reader = SecretConfigReader::new(&path, false);
        assert_eq!(reader.get_secret_config().await, Some(SecretConfig::default()));
        assert!(!reader.is_publishing_configured().await);
    }

    #[tokio::test]
    async fn test_publishing_truth_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env.secret");
        let reader = SecretConfigReader::new(&path, false);

        std::fs::write(&path, FULL).unwrap();
        assert!(reader.is_publishing_configured().await);

        std::fs::write(&path, "MAP_STORAGE_URL=u\nMAP_STORAGE_API_KEY=k\n").unwrap();
        assert!(!reader.is_publishing_configured().await);

        std::fs::write(&path, "MAP_STORAGE_URL=u\nMAP_STORAGE_API_KEY=k\nUPLOAD_DIRECTORY= \n").unwrap();
        assert!(!reader.is_publishing_configured().await);
    }

    #[tokio::test]
    async fn test_rereads_without_memo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env.secret");
        let reader = SecretConfigReader::new(&path, false);

        assert_eq!(reader.get_secret_config().await, None);
        std::fs::write(&path, FULL).unwrap();
        assert!(reader.get_secret_config().await.is_some());
    }

    #[tokio::test]
    async fn test_memo_holds_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env.secret");
        let reader = SecretConfigReader::new(&path, true);

        assert_eq!(reader.get_secret_config().await, None);
        std::fs::write(&path, FULL).unwrap();
        assert_eq!(reader.get_secret_config().await, None);

        reader.invalidate();
        assert!(reader.is_publishing_configured().await);
    }
}
