use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use scout_core::{ChatReply, ScrapeFailure, ScrapeRejection, ScrapeReport, TreeNode};
use scout_logging::{scout_debug, scout_warn};
use serde_json::json;
use url::Url;

use crate::settings::{ARCHIVE_PATH, CHAT_PATH, DOWNLOAD_PATH, SCRAPE_PATH, TREE_PATH};
use crate::types::map_reqwest_error;
use crate::{ClientSettings, DownloadKind, FailureKind, RequestError};

/// Request/response calls against the backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn folder_structure(&self) -> Result<TreeNode, RequestError>;

    async fn download(&self, path: &str, kind: DownloadKind) -> Result<Bytes, RequestError>;

    async fn chat(&self, message: &str) -> Result<ChatReply, RequestError>;

    async fn submit_scrape(&self, websites: &[String]) -> Result<ScrapeReport, ScrapeFailure>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    settings: ClientSettings,
}

impl ReqwestBackend {
    pub fn new(settings: ClientSettings) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| RequestError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn download_url(&self, path: &str, kind: DownloadKind) -> Result<Url, RequestError> {
        let endpoint = match kind {
            DownloadKind::File => DOWNLOAD_PATH,
            DownloadKind::Archive => ARCHIVE_PATH,
        };
        let mut url = self.settings.endpoint(endpoint)?;
        url.query_pairs_mut().append_pair("path", path);
        Ok(url)
    }

    async fn get_bytes(&self, url: Url) -> Result<Bytes, RequestError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        response.bytes().await.map_err(map_reqwest_error)
    }

    async fn post_json(
        &self,
        url: Url,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, RequestError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| RequestError::new(FailureKind::Decode, err.to_string()))?;
        self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn folder_structure(&self) -> Result<TreeNode, RequestError> {
        let url = self.settings.endpoint(TREE_PATH)?;
        let body = self.get_bytes(url).await?;
        serde_json::from_slice(&body)
            .map_err(|err| RequestError::new(FailureKind::Decode, err.to_string()))
    }

    async fn download(&self, path: &str, kind: DownloadKind) -> Result<Bytes, RequestError> {
        let url = self.download_url(path, kind)?;
        scout_debug!("Downloading {:?} from {}", path, url);
        self.get_bytes(url).await
    }

    async fn chat(&self, message: &str) -> Result<ChatReply, RequestError> {
        let url = self.settings.endpoint(CHAT_PATH)?;
        let response = self.post_json(url, &json!({ "message": message })).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| RequestError::new(FailureKind::Decode, err.to_string()))
    }

    async fn submit_scrape(&self, websites: &[String]) -> Result<ScrapeReport, ScrapeFailure> {
        let transport = |err: RequestError| ScrapeFailure::Transport(err.to_string());

        let url = self.settings.endpoint(SCRAPE_PATH).map_err(transport)?;
        let response = self
            .post_json(url, &json!({ "websites": websites }))
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| transport(map_reqwest_error(err)))?;

        if status.is_success() {
            if let Ok(report) = serde_json::from_slice::<ScrapeReport>(&body) {
                return Ok(report);
            }
        }

        match serde_json::from_slice::<ScrapeRejection>(&body) {
            Ok(rejection)
                if rejection.message.is_some()
                    || rejection.error.is_some()
                    || !rejection.errors.is_empty() =>
            {
                scout_warn!(
                    "Scrape rejected with status {}: {} ({} source errors)",
                    status,
                    rejection.summary(),
                    rejection.errors.len()
                );
                Err(ScrapeFailure::Rejected(rejection))
            }
            _ if status.is_success() => Err(transport(RequestError::new(
                FailureKind::Decode,
                "no analyzed_data in response",
            ))),
            _ => Err(transport(RequestError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ))),
        }
    }
}
