use scout_core::{Effect, Msg};
use scout_engine::{
    ClientSettings, DownloadKind, EngineError, EngineEvent, EngineHandle, StreamEvent,
};
use scout_logging::{scout_debug, scout_info};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenStream => self.engine.open_stream(),
                Effect::CloseStream => self.engine.close_stream(),
                Effect::FetchTree { request_id } => {
                    scout_debug!("FetchTree request_id={}", request_id);
                    self.engine.fetch_tree(request_id);
                }
                Effect::DownloadFile {
                    path,
                    name,
                    save_as,
                } => {
                    scout_info!("Download file {:?} as {:?}", path, save_as);
                    self.engine.download(path, name, save_as, DownloadKind::File);
                }
                Effect::DownloadArchive {
                    path,
                    name,
                    save_as,
                } => {
                    scout_info!("Download folder {:?} as {:?}", path, save_as);
                    self.engine
                        .download(path, name, save_as, DownloadKind::Archive);
                }
                // One timer kind, so the generation doubles as the token.
                Effect::ScheduleProgressHide { generation, delay } => {
                    self.engine.start_timer(generation, delay);
                }
                Effect::SendChat { message } => self.engine.send_chat(message),
                Effect::SubmitScrape { websites } => self.engine.submit_scrape(websites),
            }
        }
    }

    /// Everything the engine has reported since the last call, in arrival order.
    pub fn drain(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(engine_event_to_msg)
            .collect()
    }
}

pub fn engine_event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Stream(StreamEvent::Opened) => Msg::StreamOpened,
        EngineEvent::Stream(StreamEvent::Retrying { attempt, delay }) => {
            Msg::StreamRetrying { attempt, delay }
        }
        EngineEvent::Stream(StreamEvent::Failed) => Msg::StreamFailed,
        EngineEvent::Stream(StreamEvent::Log(event)) => Msg::LogReceived(event),
        EngineEvent::Stream(StreamEvent::Progress(event)) => Msg::ProgressReceived(event),
        EngineEvent::TreeLoaded { request_id, result } => match result {
            Ok(root) => Msg::TreeLoaded { request_id, root },
            Err(err) => Msg::TreeLoadFailed {
                request_id,
                error: err.to_string(),
            },
        },
        EngineEvent::DownloadFinished { name, result } => Msg::DownloadFinished {
            name,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::ChatFinished(Ok(reply)) => Msg::ChatReplied(reply),
        EngineEvent::ChatFinished(Err(err)) => Msg::ChatFailed(err.to_string()),
        EngineEvent::ScrapeFinished(result) => Msg::ScrapeFinished(result),
        EngineEvent::TimerElapsed { token } => Msg::ProgressHideElapsed { generation: token },
    }
}
