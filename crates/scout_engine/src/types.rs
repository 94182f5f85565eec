use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use scout_core::{ChatReply, LogEvent, ProgressEvent, ScrapeFailure, ScrapeReport, TreeNode};

use crate::persist::PersistError;

/// Everything the engine reports back to the UI thread, in arrival order.
#[derive(Debug)]
pub enum EngineEvent {
    Stream(StreamEvent),
    TreeLoaded {
        request_id: u64,
        result: Result<TreeNode, RequestError>,
    },
    DownloadFinished {
        name: String,
        result: Result<PathBuf, RequestError>,
    },
    ChatFinished(Result<ChatReply, RequestError>),
    ScrapeFinished(Result<ScrapeReport, ScrapeFailure>),
    TimerElapsed {
        token: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Opened,
    Retrying { attempt: u32, delay: Duration },
    Failed,
    Log(LogEvent),
    Progress(ProgressEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    File,
    Archive,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RequestError {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<PersistError> for RequestError {
    fn from(err: PersistError) -> Self {
        RequestError::new(FailureKind::Persist, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    Persist,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response body"),
            FailureKind::Persist => write!(f, "could not save file"),
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return RequestError::new(FailureKind::Decode, err.to_string());
    }
    RequestError::new(FailureKind::Network, err.to_string())
}
