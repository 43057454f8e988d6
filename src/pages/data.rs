//! Logical pages and the data handed to their templates.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::secret::SecretConfig;

pub const DEFAULT_META_TITLE: &str = "WorkAdventure Starter Kit";
pub const DEFAULT_PAGE_TITLE: &str = "WorkAdventure build your map";
pub const SELF_HOSTED_META_TITLE: &str = "WorkAdventure Starter Kit - Self-hosted";
pub const SELF_HOSTED_TEST_PAGE_TITLE: &str = "WorkAdventure test map - Self-hosted";
pub const SELF_HOSTED_MAPS_PAGE_TITLE: &str = "Your maps - Self-hosted";

/// Which secret values a page exposes to its template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretProjection {
    None,
    /// `isPublishingConfigured` and `mapStorageUrl`.
    PublishFlag,
    /// `mapStorageUrl`, `mapStorageApiKey` and `uploadDirectory`.
    AllFields,
}

/// A logical page: selects the template, head script and secret projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Index,
    Step1Git,
    Step2Hosting,
    Step3Steps,
    Step3StepsSelfHosted,
    Step4Validated,
    Step4ValidatedSelfHosted,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Index,
        Page::Step1Git,
        Page::Step2Hosting,
        Page::Step3Steps,
        Page::Step3StepsSelfHosted,
        Page::Step4Validated,
        Page::Step4ValidatedSelfHosted,
    ];

    /// Logical page name, also the template name.
    pub fn name(self) -> &'static str {
        match self {
            Page::Index => "index",
            Page::Step1Git => "step1-git",
            Page::Step2Hosting => "step2-hosting",
            Page::Step3Steps => "step3-steps",
            Page::Step3StepsSelfHosted => "step3-steps-selfhosted",
            Page::Step4Validated => "step4-validated",
            Page::Step4ValidatedSelfHosted => "step4-validated-selfhosted",
        }
    }

    pub fn route(self) -> &'static str {
        match self {
            Page::Index => "/",
            Page::Step1Git => "/step1-git",
            Page::Step2Hosting => "/step2-hosting",
            Page::Step3Steps => "/step3-steps",
            Page::Step3StepsSelfHosted => "/step3-steps-selfhosted",
            Page::Step4Validated => "/step4-validated",
            Page::Step4ValidatedSelfHosted => "/step4-validated-selfhosted",
        }
    }

    /// Head-script fragment name; `None` injects nothing.
    pub fn head_script(self) -> Option<&'static str> {
        match self {
            Page::Index => Some("index"),
            Page::Step1Git | Page::Step3Steps | Page::Step4Validated => Some("background-fade"),
            Page::Step2Hosting => None,
            Page::Step3StepsSelfHosted => Some("background-fade-selfhosted"),
            Page::Step4ValidatedSelfHosted => Some("selfhosted-maps"),
        }
    }

    /// `(metaTitle, pageTitle)` overrides.
    pub fn title_overrides(self) -> (Option<&'static str>, Option<&'static str>) {
        match self {
            Page::Step3StepsSelfHosted => {
                (Some(SELF_HOSTED_META_TITLE), Some(SELF_HOSTED_TEST_PAGE_TITLE))
            }
            Page::Step4ValidatedSelfHosted => {
                (Some(SELF_HOSTED_META_TITLE), Some(SELF_HOSTED_MAPS_PAGE_TITLE))
            }
            _ => (None, None),
        }
    }

    pub fn secret_projection(self) -> SecretProjection {
        match self {
            Page::Index => SecretProjection::PublishFlag,
            Page::Step3Steps | Page::Step3StepsSelfHosted => SecretProjection::AllFields,
            _ => SecretProjection::None,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown page {0:?}")]
pub struct UnknownPage(pub String);

impl FromStr for Page {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|page| page.name() == s)
            .ok_or_else(|| UnknownPage(s.to_string()))
    }
}

/// Template data for one request.
///
/// The head fields are always present. Page-specific keys are omitted from
/// the serialized mapping when the page does not use them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub meta_title: String,
    pub page_title: String,
    pub head_scripts: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_publishing_configured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_storage_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_storage_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_directory: Option<String>,
}

impl PageData {
    /// Head data with defaults for every title not overridden.
    pub fn head(meta_title: Option<&str>, page_title: Option<&str>, head_scripts: String) -> Self {
        Self {
            meta_title: meta_title.unwrap_or(DEFAULT_META_TITLE).to_string(),
            page_title: page_title.unwrap_or(DEFAULT_PAGE_TITLE).to_string(),
            head_scripts,
            is_publishing_configured: None,
            map_storage_url: None,
            map_storage_api_key: None,
            upload_directory: None,
        }
    }

    /// Page data for `page` given its resolved head script and secret lookup.
    pub fn for_page(page: Page, head_scripts: String, secret: Option<&SecretConfig>) -> Self {
        let (meta_title, page_title) = page.title_overrides();
        let mut data = Self::head(meta_title, page_title, head_scripts);

        // Templates expect strings; absent values project as "".
        let url = secret.and_then(|s| s.map_storage_url.clone()).unwrap_or_default();

        match page.secret_projection() {
            SecretProjection::None => {}
            SecretProjection::PublishFlag => {
                data.is_publishing_configured = Some(secret.is_some_and(SecretConfig::is_complete));
                data.map_storage_url = Some(url);
            }
            SecretProjection::AllFields => {
                data.map_storage_url = Some(url);
                data.map_storage_api_key =
                    Some(secret.and_then(|s| s.map_storage_api_key.clone()).unwrap_or_default());
                data.upload_directory =
                    Some(secret.and_then(|s| s.upload_directory.clone()).unwrap_or_default());
            }
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_secret() -> SecretConfig {
        SecretConfig {
            map_storage_url: Some("https://maps.example.com".into()),
            map_storage_api_key: Some("key".into()),
            upload_directory: Some("world".into()),
        }
    }

    #[test]
    fn test_default_titles() {
        for page in Page::ALL {
            if matches!(page, Page::Step3StepsSelfHosted | Page::Step4ValidatedSelfHosted) {
                continue;
            }
            let data = PageData::for_page(page, String::new(), None);
            assert_eq!(data.meta_title, DEFAULT_META_TITLE, "{page}");
            assert_eq!(data.page_title, DEFAULT_PAGE_TITLE, "{page}");
        }
    }

    #[test]
    fn test_self_hosted_titles_ignore_secret_state() {
        for secret in [None, Some(SecretConfig::default()), Some(full_secret())] {
            let step3 = PageData::for_page(Page::Step3StepsSelfHosted, String::new(), secret.as_ref());
            assert_eq!(step3.meta_title, SELF_HOSTED_META_TITLE);
            assert_eq!(step3.page_title, SELF_HOSTED_TEST_PAGE_TITLE);

            let step4 = PageData::for_page(Page::Step4ValidatedSelfHosted, String::new(), secret.as_ref());
            assert_eq!(step4.meta_title, SELF_HOSTED_META_TITLE);
            assert_eq!(step4.page_title, SELF_HOSTED_MAPS_PAGE_TITLE);
        }
    }

    #[test]
    fn test_index_projection() {
        let off = PageData::for_page(Page::Index, String::new(), None);
        assert_eq!(off.is_publishing_configured, Some(false));
        assert_eq!(off.map_storage_url.as_deref(), Some(""));
        assert_eq!(off.map_storage_api_key, None);

        let on = PageData::for_page(Page::Index, String::new(), Some(&full_secret()));
        assert_eq!(on.is_publishing_configured, Some(true));
        assert_eq!(on.map_storage_url.as_deref(), Some("https://maps.example.com"));
    }

    #[test]
    fn test_all_fields_projection_defaults_to_empty() {
        let partial = SecretConfig {
            upload_directory: Some("world".into()),
            ..SecretConfig::default()
        };
        let data = PageData::for_page(Page::Step3Steps, String::new(), Some(&partial));
        assert_eq!(data.map_storage_url.as_deref(), Some(""));
        assert_eq!(data.map_storage_api_key.as_deref(), Some(""));
        assert_eq!(data.upload_directory.as_deref(), Some("world"));
        assert_eq!(data.is_publishing_configured, None);
    }

    #[test]
    fn test_serialized_keys() {
        let data = PageData::for_page(Page::Step2Hosting, String::new(), Some(&full_secret()));
        let value = serde_json::to_value(&data).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&"metaTitle".to_string()));
        assert!(keys.contains(&"pageTitle".to_string()));
        assert!(keys.contains(&"headScripts".to_string()));
    }

    #[test]
    fn test_page_names_round_trip_routes() {
        for page in Page::ALL {
            assert_eq!(page.name().parse::<Page>().unwrap(), page);
            if page != Page::Index {
                assert_eq!(page.route(), format!("/{}", page.name()));
            }
        }
        assert!("step9".parse::<Page>().is_err());
    }

    #[test]
    fn test_head_script_table() {
        assert_eq!(Page::Step2Hosting.head_script(), None);
        assert_eq!(Page::Step1Git.head_script(), Some("background-fade"));
        assert_eq!(Page::Step4ValidatedSelfHosted.head_script(), Some("selfhosted-maps"));
    }
}
