//! Scout core: pure state machine and view-model helpers for the client.
mod connection;
mod control;
mod effect;
mod log_feed;
mod msg;
mod progress;
mod state;
mod submission;
mod tree;
mod update;
mod view_model;

pub use connection::{
    ConnectionState, ReconnectPolicy, ReconnectTracker, RetryDecision, LOST_CONNECTION_MESSAGE,
};
pub use control::{ControlEmphasis, JobControlState};
pub use effect::Effect;
pub use log_feed::{LogEvent, LogFeed, LogLevel};
pub use msg::Msg;
pub use progress::{JobStatus, ProgressEvent, ProgressState, ProgressStats, PROGRESS_HIDE_DELAY};
pub use state::AppState;
pub use submission::{
    AnalyzedSite, Author, ChatMessage, ChatReply, ImageRef, ScrapeFailure, ScrapeRejection,
    ScrapeReport, SiteMetadata, SourceError, WebsiteCandidate,
};
pub use tree::{
    file_category, save_name, truncate_name, ExpansionState, FileCategory, FileTree, NodeId,
    NodeKind, RowAction, TreeNode, ARCHIVE_SUFFIX, NAME_DISPLAY_LIMIT,
};
pub use update::update;
pub use view_model::{
    AppViewModel, ChatView, ControlsView, DrawerView, LogView, ProgressView, ResultRowView,
    TreeRowView,
};
