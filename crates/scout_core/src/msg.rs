use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Client started; open the event stream.
    SessionStarted,
    /// Client is shutting down; release the event stream.
    SessionEnded,
    /// Event stream handshake succeeded.
    StreamOpened,
    /// Event stream dropped; a reconnect is scheduled.
    StreamRetrying { attempt: u32, delay: Duration },
    /// Event stream exhausted its reconnect attempts.
    StreamFailed,
    /// Well-formed `log` event from the stream.
    LogReceived(crate::LogEvent),
    /// Well-formed `progress` event from the stream.
    ProgressReceived(crate::ProgressEvent),
    /// Grace timer after completion fired.
    ProgressHideElapsed { generation: u64 },
    /// User clicked the drawer button.
    DrawerToggled,
    /// User clicked the drawer close button.
    DrawerClosed,
    /// Folder-structure query answered.
    TreeLoaded {
        request_id: u64,
        root: crate::TreeNode,
    },
    /// Folder-structure query failed.
    TreeLoadFailed { request_id: u64, error: String },
    /// User clicked a directory row.
    DirectoryToggled { path: String },
    /// User clicked a row's download action.
    DownloadRequested { path: String },
    /// Download saved or failed.
    DownloadFinished {
        name: String,
        result: Result<PathBuf, String>,
    },
    /// User clicked Pause/Resume.
    PauseToggled,
    /// User clicked Cancel; asks for confirmation.
    CancelRequested,
    /// User confirmed the cancel prompt.
    CancelConfirmed,
    /// User dismissed the cancel prompt.
    CancelDismissed,
    /// User closed the log panel.
    LogPanelClosed,
    /// User sent a chat message.
    ChatSubmitted(String),
    /// Agent answered a chat message.
    ChatReplied(crate::ChatReply),
    /// Chat request failed.
    ChatFailed(String),
    /// User flipped one website checkbox.
    WebsiteToggled { index: usize },
    /// User submitted the selected websites for scraping.
    ScrapeSubmitted,
    /// Scrape submission answered.
    ScrapeFinished(Result<crate::ScrapeReport, crate::ScrapeFailure>),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
