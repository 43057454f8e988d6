//! Client for the map and image listing endpoints.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::observability::metrics;

pub const MAPS_LIST_PATH: &str = "maps/list";
pub const IMAGES_LIST_PATH: &str = "images/list";

/// One entry of `GET /maps/list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDescriptor {
    #[serde(default)]
    pub map_image: Option<String>,
    #[serde(default)]
    pub map_name: Option<String>,
    #[serde(default)]
    pub map_description: Option<String>,
    pub path: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub last_modified_formatted: Option<String>,
    /// Size in megabytes; the listing sends either a number or a string.
    #[serde(default)]
    pub size: Option<serde_json::Value>,
}

/// Error type for collaborator calls.
#[derive(Debug, thiserror::Error)]
pub enum MapsError {
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported base URL scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned status {status}")]
    Status { endpoint: &'static str, status: u16 },
}

/// Parse a collaborator base URL, keeping any path prefix for joins.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, MapsError> {
    let mut url = Url::parse(raw)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(MapsError::UnsupportedScheme(url.scheme().to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Fetches the listings. Every failure is logged and degrades to an empty list.
#[derive(Debug, Clone)]
pub struct MapsClient {
    http: reqwest::Client,
    base: Url,
}

impl MapsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MapsError> {
        let http = reqwest::Client::builder().timeout(timeout).no_proxy().build()?;
        Ok(Self {
            http,
            base: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Map descriptors in listing order.
    pub async fn list_maps(&self) -> Vec<MapDescriptor> {
        self.list_or_empty(MAPS_LIST_PATH).await
    }

    /// Image paths in listing order.
    pub async fn list_images(&self) -> Vec<String> {
        self.list_or_empty(IMAGES_LIST_PATH).await
    }

    async fn list_or_empty<T: DeserializeOwned>(&self, endpoint: &'static str) -> Vec<T> {
        match self.fetch_list(endpoint).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "Listing unavailable, using empty list");
                metrics::record_collaborator_failure(endpoint);
                Vec::new()
            }
        }
    }

    async fn fetch_list<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<Vec<T>, MapsError> {
        let url = self.base.join(endpoint)?;
        let res = self.http.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(MapsError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        Ok(res.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_optional_fields() {
        let maps: Vec<MapDescriptor> = serde_json::from_str(
            r#"[
                {"path": "office.tmj"},
                {"path": "conference.tmj", "mapImage": "img/conf.png", "size": 1.2,
                 "lastModifiedFormatted": "01/02/2026", "filename": "conference"}
            ]"#,
        )
        .unwrap();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0].map_image, None);
        assert_eq!(maps[1].map_image.as_deref(), Some("img/conf.png"));
        assert_eq!(maps[1].filename.as_deref(), Some("conference"));
        assert!(maps[1].size.is_some());
    }

    #[test]
    fn test_base_url_keeps_prefix() {
        let base = parse_base_url("http://localhost:5173/kit").unwrap();
        assert_eq!(base.join(MAPS_LIST_PATH).unwrap().as_str(), "http://localhost:5173/kit/maps/list");

        let base = parse_base_url("http://localhost:5173").unwrap();
        assert_eq!(base.join(IMAGES_LIST_PATH).unwrap().as_str(), "http://localhost:5173/images/list");
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        assert!(matches!(
            parse_base_url("file:///tmp"),
            Err(MapsError::UnsupportedScheme(s)) if s == "file"
        ));
        assert!(matches!(parse_base_url("not a url"), Err(MapsError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_unreachable_collaborator_degrades_to_empty() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let client = MapsClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        assert!(client.list_maps().await.is_empty());
        assert!(client.list_images().await.is_empty());
    }
}
