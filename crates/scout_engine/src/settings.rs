use std::path::PathBuf;
use std::time::Duration;

use scout_core::ReconnectPolicy;
use url::Url;

use crate::{FailureKind, RequestError};

pub(crate) const STREAM_PATH: &str = "stream";
pub(crate) const TREE_PATH: &str = "api/folder-structure";
pub(crate) const DOWNLOAD_PATH: &str = "api/download";
pub(crate) const ARCHIVE_PATH: &str = "api/download-folder";
pub(crate) const CHAT_PATH: &str = "api/chat";
pub(crate) const SCRAPE_PATH: &str = "api/scrape";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Backend root; every endpoint is resolved relative to it.
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// Applies to request/response calls, never to the event stream.
    pub request_timeout: Duration,
    pub reconnect: ReconnectPolicy,
    pub download_dir: PathBuf,
}

impl ClientSettings {
    pub fn new(base_url: Url, download_dir: PathBuf) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            reconnect: ReconnectPolicy::default(),
            download_dir,
        }
    }

    pub fn parse(base_url: &str, download_dir: PathBuf) -> Result<Self, RequestError> {
        let url = Url::parse(base_url)
            .map_err(|err| RequestError::new(FailureKind::InvalidUrl, err.to_string()))?;
        Ok(Self::new(url, download_dir))
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, RequestError> {
        with_trailing_slash(self.base_url.clone())
            .join(path)
            .map_err(|err| RequestError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

// `Url::join` replaces the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_the_base_path() {
        let settings =
            ClientSettings::parse("http://localhost:5000/scout", PathBuf::from("out")).unwrap();
        assert_eq!(
            settings.endpoint(TREE_PATH).unwrap().as_str(),
            "http://localhost:5000/scout/api/folder-structure"
        );

        let settings = ClientSettings::parse("http://localhost:5000", PathBuf::from("out")).unwrap();
        assert_eq!(
            settings.endpoint(STREAM_PATH).unwrap().as_str(),
            "http://localhost:5000/stream"
        );
    }

    #[test]
    fn rejects_unparseable_base() {
        let err = ClientSettings::parse("not a url", PathBuf::from("out")).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
