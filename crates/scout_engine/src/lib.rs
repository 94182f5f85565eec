//! Scout engine: event stream, backend calls and downloads.
mod api;
mod engine;
mod filename;
mod persist;
mod settings;
mod sse;
mod stream;
mod types;

pub use api::{Backend, ReqwestBackend};
pub use engine::{EngineError, EngineHandle};
pub use filename::safe_file_name;
pub use persist::{ensure_output_dir, numbered_name, DownloadStore, PersistError};
pub use settings::ClientSettings;
pub use sse::{SseDecoder, SseFrame};
pub use stream::{decode_frame, ChannelSink, EventSink, EventStreamClient, StreamHandle};
pub use types::{DownloadKind, EngineEvent, FailureKind, RequestError, StreamEvent};
