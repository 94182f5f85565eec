use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use scout_logging::{scout_debug, scout_info, scout_warn};
use tokio::runtime::Runtime;

use crate::api::{Backend, ReqwestBackend};
use crate::persist::DownloadStore;
use crate::stream::{ChannelSink, EventSink, EventStreamClient, StreamHandle};
use crate::{ClientSettings, DownloadKind, EngineEvent, FailureKind, RequestError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("could not start async runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("invalid client settings: {0}")]
    Settings(#[from] RequestError),
}

enum EngineCommand {
    OpenStream,
    CloseStream,
    FetchTree {
        request_id: u64,
    },
    Download {
        path: String,
        name: String,
        save_as: String,
        kind: DownloadKind,
    },
    SendChat {
        message: String,
    },
    SubmitScrape {
        websites: Vec<String>,
    },
    StartTimer {
        token: u64,
        delay: Duration,
    },
}

/// Runs all network and disk work on a background thread.
///
/// Commands go in through the handle's methods; results come back as
/// [`EngineEvent`]s, polled with [`EngineHandle::try_recv`]. At most one event
/// stream is open at a time. Dropping the handle closes it.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let stream = EventStreamClient::new(&settings)?;
        let store = DownloadStore::new(settings.download_dir.clone());
        let backend = ReqwestBackend::new(settings)?;
        Self::with_backend(Arc::new(backend), stream, store)
    }

    /// Build an engine around any [`Backend`], e.g. a test double.
    pub fn with_backend(
        backend: Arc<dyn Backend>,
        stream: EventStreamClient,
        store: DownloadStore,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("scout-engine")
            .build()?;

        thread::spawn(move || {
            run_commands(runtime, cmd_rx, event_tx, backend, stream, store);
        });

        Ok(Self { cmd_tx, event_rx })
    }

    /// Open the event stream, replacing any stream already open.
    pub fn open_stream(&self) {
        self.send(EngineCommand::OpenStream);
    }

    pub fn close_stream(&self) {
        self.send(EngineCommand::CloseStream);
    }

    pub fn fetch_tree(&self, request_id: u64) {
        self.send(EngineCommand::FetchTree { request_id });
    }

    pub fn download(
        &self,
        path: impl Into<String>,
        name: impl Into<String>,
        save_as: impl Into<String>,
        kind: DownloadKind,
    ) {
        self.send(EngineCommand::Download {
            path: path.into(),
            name: name.into(),
            save_as: save_as.into(),
            kind,
        });
    }

    pub fn send_chat(&self, message: impl Into<String>) {
        self.send(EngineCommand::SendChat {
            message: message.into(),
        });
    }

    pub fn submit_scrape(&self, websites: Vec<String>) {
        self.send(EngineCommand::SubmitScrape { websites });
    }

    /// Deliver `EngineEvent::TimerElapsed { token }` after `delay`.
    pub fn start_timer(&self, token: u64, delay: Duration) {
        self.send(EngineCommand::StartTimer { token, delay });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            scout_warn!("Engine thread is gone; command dropped");
        }
    }
}

fn run_commands(
    runtime: Runtime,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    backend: Arc<dyn Backend>,
    stream_client: EventStreamClient,
    store: DownloadStore,
) {
    let mut stream: Option<StreamHandle> = None;

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::OpenStream => {
                if let Some(previous) = stream.take() {
                    scout_debug!("Closing previous event stream before reopening");
                    previous.close();
                }
                let sink: Arc<dyn EventSink> = Arc::new(ChannelSink::new(event_tx.clone()));
                stream = Some(stream_client.open(runtime.handle(), sink));
            }
            EngineCommand::CloseStream => {
                if let Some(handle) = stream.take() {
                    scout_info!("Closing event stream");
                    handle.close();
                }
            }
            command => {
                let backend = backend.clone();
                let store = store.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    if let Some(event) = handle_command(backend.as_ref(), store, command).await {
                        let _ = event_tx.send(event);
                    }
                });
            }
        }
    }

    drop(stream);
    runtime.shutdown_background();
    scout_debug!("Engine thread stopped");
}

async fn handle_command(
    backend: &dyn Backend,
    store: DownloadStore,
    command: EngineCommand,
) -> Option<EngineEvent> {
    match command {
        EngineCommand::FetchTree { request_id } => {
            let result = backend.folder_structure().await;
            Some(EngineEvent::TreeLoaded { request_id, result })
        }
        EngineCommand::Download {
            path,
            name,
            save_as,
            kind,
        } => {
            let result = download(backend, store, &path, &save_as, kind).await;
            match &result {
                Ok(saved) => scout_info!("Saved {:?} to {}", path, saved.display()),
                Err(err) => scout_warn!("Download of {:?} failed: {}", path, err),
            }
            Some(EngineEvent::DownloadFinished { name, result })
        }
        EngineCommand::SendChat { message } => {
            Some(EngineEvent::ChatFinished(backend.chat(&message).await))
        }
        EngineCommand::SubmitScrape { websites } => {
            scout_info!("Submitting {} websites for scraping", websites.len());
            Some(EngineEvent::ScrapeFinished(
                backend.submit_scrape(&websites).await,
            ))
        }
        EngineCommand::StartTimer { token, delay } => {
            tokio::time::sleep(delay).await;
            Some(EngineEvent::TimerElapsed { token })
        }
        EngineCommand::OpenStream | EngineCommand::CloseStream => None,
    }
}

async fn download(
    backend: &dyn Backend,
    store: DownloadStore,
    path: &str,
    save_as: &str,
    kind: DownloadKind,
) -> Result<PathBuf, RequestError> {
    let content = backend.download(path, kind).await?;
    let save_as = save_as.to_string();
    let saved = tokio::task::spawn_blocking(move || store.save(&save_as, &content))
        .await
        .map_err(|err| RequestError::new(FailureKind::Persist, err.to_string()))??;
    Ok(saved)
}
