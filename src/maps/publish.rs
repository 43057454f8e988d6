//! Client for the upload collaborator behind the "publish" button.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use url::Url;

use crate::maps::catalog::{parse_base_url, MapsError};
use crate::observability::metrics;

pub const UPLOAD_PATH: &str = "uploader/upload";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to publish maps. Please try again.";
pub const TRANSPORT_FAILURE_MESSAGE: &str = "An error occurred while publishing maps.";
pub const POST_PUBLISH_REDIRECT: &str = "/step4-validated";

/// Result of one publish attempt, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published { redirect: String },
    Failed(String),
}

#[derive(Debug, Default, Deserialize)]
struct UploadFailure {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl PublishOutcome {
    pub fn published() -> Self {
        PublishOutcome::Published {
            redirect: POST_PUBLISH_REDIRECT.to_string(),
        }
    }

    /// Message from a failed upload's body: `message`, else `error`, else a
    /// generic text. Unparseable bodies get the generic text.
    pub fn from_failure_body(body: &[u8]) -> Self {
        let failure: UploadFailure = serde_json::from_slice(body).unwrap_or_default();
        let message = failure
            .message
            .filter(|m| !m.is_empty())
            .or(failure.error.filter(|e| !e.is_empty()))
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
        PublishOutcome::Failed(message)
    }

    pub fn is_published(&self) -> bool {
        matches!(self, PublishOutcome::Published { .. })
    }
}

/// Triggers `POST /uploader/upload`.
#[derive(Debug, Clone)]
pub struct PublishClient {
    http: reqwest::Client,
    upload_url: Url,
}

impl PublishClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MapsError> {
        let http = reqwest::Client::builder().timeout(timeout).no_proxy().build()?;
        let upload_url = parse_base_url(base_url)?.join(UPLOAD_PATH)?;
        Ok(Self { http, upload_url })
    }

    pub async fn publish(&self) -> PublishOutcome {
        let res = match self
            .http
            .post(self.upload_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                tracing::error!(url = %self.upload_url, error = %e, "Error publishing maps");
                metrics::record_collaborator_failure(UPLOAD_PATH);
                return PublishOutcome::Failed(TRANSPORT_FAILURE_MESSAGE.to_string());
            }
        };

        let status = res.status();
        if status.is_success() {
            tracing::info!(status = %status, "Maps published");
            return PublishOutcome::published();
        }

        let body = res.bytes().await.unwrap_or_default();
        let outcome = PublishOutcome::from_failure_body(&body);
        tracing::warn!(status = %status, outcome = ?outcome, "Upload rejected");
        metrics::record_collaborator_failure(UPLOAD_PATH);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_precedence() {
        assert_eq!(
            PublishOutcome::from_failure_body(br#"{"message": "Quota exceeded", "error": "E42"}"#),
            PublishOutcome::Failed("Quota exceeded".into())
        );
        assert_eq!(
            PublishOutcome::from_failure_body(br#"{"error": "Bad API key"}"#),
            PublishOutcome::Failed("Bad API key".into())
        );
        assert_eq!(
            PublishOutcome::from_failure_body(br#"{"message": "", "error": "Bad API key"}"#),
            PublishOutcome::Failed("Bad API key".into())
        );
    }

    #[test]
    fn test_failure_without_usable_body() {
        let bodies: [&[u8]; 4] = [b"", b"<html>502</html>", b"{}", br#"{"message": 5}"#];
        for body in bodies {
            assert_eq!(
                PublishOutcome::from_failure_body(body),
                PublishOutcome::Failed(DEFAULT_FAILURE_MESSAGE.into())
            );
        }
    }

    #[test]
    fn test_upload_url() {
        let client = PublishClient::new("http://localhost:5173", Duration::from_secs(1)).unwrap();
        assert_eq!(client.upload_url.as_str(), "http://localhost:5173/uploader/upload");
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = PublishClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        assert_eq!(
            client.publish().await,
            PublishOutcome::Failed(TRANSPORT_FAILURE_MESSAGE.into())
        );
    }
}
