use std::sync::{mpsc, Arc};

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use scout_core::{LogEvent, ProgressEvent, ReconnectPolicy, ReconnectTracker, RetryDecision};
use scout_logging::{scout_debug, scout_info, scout_warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::settings::STREAM_PATH;
use crate::sse::{SseDecoder, SseFrame};
use crate::{ClientSettings, EngineEvent, FailureKind, RequestError, StreamEvent};

const LAST_EVENT_ID: &str = "Last-Event-ID";

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Why one connection ended.
#[derive(Debug, thiserror::Error)]
enum Disconnect {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("handshake rejected with http status {0}")]
    Status(u16),
    #[error("read failed: {0}")]
    Read(String),
    #[error("server closed the stream")]
    Closed,
}

/// Opens the server-push channel and keeps it alive.
#[derive(Debug, Clone)]
pub struct EventStreamClient {
    client: reqwest::Client,
    endpoint: Url,
    policy: ReconnectPolicy,
}

impl EventStreamClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, RequestError> {
        // No overall timeout: the response body lives as long as the session.
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| RequestError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            endpoint: settings.endpoint(STREAM_PATH)?,
            policy: settings.reconnect,
        })
    }

    /// Spawn the stream task. Never fails: an unreachable server shows up
    /// as `Retrying` and eventually `Failed` events on the sink.
    pub fn open(&self, runtime: &Handle, sink: Arc<dyn EventSink>) -> StreamHandle {
        let cancel = CancellationToken::new();
        let task = runtime.spawn(run_stream(self.clone(), sink, cancel.clone()));
        scout_info!("Opened event stream to {}", self.endpoint);
        StreamHandle { cancel, task }
    }
}

/// Owns a running stream task. Dropping the handle closes the stream.
#[derive(Debug)]
pub struct StreamHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl StreamHandle {
    /// Stop the stream. The task exits at its next await point.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the task has exited, whether closed or failed.
    pub async fn join(&mut self) {
        let _ = (&mut self.task).await;
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_stream(client: EventStreamClient, sink: Arc<dyn EventSink>, cancel: CancellationToken) {
    let mut tracker = ReconnectTracker::new(client.policy);
    let mut last_event_id: Option<String> = None;

    loop {
        let disconnect = tokio::select! {
            _ = cancel.cancelled() => break,
            disconnect = read_connection(&client, &mut tracker, &mut last_event_id, sink.as_ref()) => disconnect,
        };
        scout_warn!("Event stream interrupted: {}", disconnect);

        match tracker.on_failure() {
            RetryDecision::Retry { attempt, delay } => {
                scout_info!("Reconnecting event stream in {:?} (attempt {})", delay, attempt);
                sink.emit(EngineEvent::Stream(StreamEvent::Retrying { attempt, delay }));
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            RetryDecision::GiveUp => {
                scout_warn!(
                    "Event stream gave up after {} failed attempts",
                    tracker.attempts().saturating_sub(1)
                );
                sink.emit(EngineEvent::Stream(StreamEvent::Failed));
                break;
            }
        }
    }
    scout_debug!("Event stream task finished");
}

async fn read_connection(
    client: &EventStreamClient,
    tracker: &mut ReconnectTracker,
    last_event_id: &mut Option<String>,
    sink: &dyn EventSink,
) -> Disconnect {
    let mut request = client
        .client
        .get(client.endpoint.clone())
        .header(ACCEPT, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache");
    if let Some(id) = last_event_id.as_deref() {
        request = request.header(LAST_EVENT_ID, id);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => return Disconnect::Connect(err.to_string()),
    };
    let status = response.status();
    if !status.is_success() {
        return Disconnect::Status(status.as_u16());
    }

    tracker.on_open();
    sink.emit(EngineEvent::Stream(StreamEvent::Opened));

    let mut decoder = SseDecoder::new();
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => return Disconnect::Read(err.to_string()),
        };
        for frame in decoder.feed(&chunk) {
            if let Some(event) = decode_frame(&frame) {
                sink.emit(EngineEvent::Stream(event));
            }
        }
        if let Some(id) = decoder.last_event_id() {
            *last_event_id = Some(id.to_string());
        }
    }
    Disconnect::Closed
}

/// Map one SSE frame to a typed event. Malformed payloads are dropped with
/// a warning; the connection stays up.
pub fn decode_frame(frame: &SseFrame) -> Option<StreamEvent> {
    match frame.event.as_str() {
        "log" => match serde_json::from_str::<LogEvent>(&frame.data) {
            Ok(event) => Some(StreamEvent::Log(event)),
            Err(err) => {
                scout_warn!("Dropping malformed log event: {} - data: {}", err, preview(&frame.data));
                None
            }
        },
        "progress" => match serde_json::from_str::<ProgressEvent>(&frame.data) {
            Ok(event) => Some(StreamEvent::Progress(event)),
            Err(err) => {
                scout_warn!(
                    "Dropping malformed progress event: {} - data: {}",
                    err,
                    preview(&frame.data)
                );
                None
            }
        },
        other => {
            scout_debug!("Ignoring stream event {:?}", other);
            None
        }
    }
}

fn preview(data: &str) -> &str {
    match data.char_indices().nth(200) {
        Some((end, _)) => &data[..end],
        None => data,
    }
}
