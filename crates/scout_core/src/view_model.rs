use crate::{
    ChatMessage, ConnectionState, ControlEmphasis, FileCategory, NodeKind,
    ProgressStats, RowAction, WebsiteCandidate,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub connection: ConnectionState,
    pub progress: ProgressView,
    pub controls: ControlsView,
    pub log: LogView,
    pub drawer: DrawerView,
    pub chat: ChatView,
    pub candidates: Vec<WebsiteCandidate>,
    pub scrape_enabled: bool,
    pub results: Vec<ResultRowView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressView {
    pub visible: bool,
    pub percent: f64,
    pub status_text: String,
    pub stats: ProgressStats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsView {
    pub paused: bool,
    pub pause_label: &'static str,
    pub pause_emphasis: ControlEmphasis,
    pub cancel_pending: bool,
    /// Controls only apply while a job's progress is showing.
    pub enabled: bool,
}

impl Default for ControlsView {
    fn default() -> Self {
        Self {
            paused: false,
            pause_label: "Pause",
            pause_emphasis: ControlEmphasis::Caution,
            cancel_pending: false,
            enabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogView {
    pub visible: bool,
    /// Lines in the feed; read them through `AppState::log`.
    pub len: usize,
    pub follow_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DrawerView {
    pub open: bool,
    pub loading: bool,
    pub rows: Vec<TreeRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRowView {
    pub path: String,
    /// Full name, shown on inspection.
    pub name: String,
    /// Name as displayed, possibly truncated.
    pub label: String,
    pub depth: usize,
    pub kind: NodeKind,
    pub category: FileCategory,
    pub expanded: bool,
    pub action: RowAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatView {
    pub messages: Vec<ChatMessage>,
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRowView {
    pub url: String,
    pub relevance: String,
    pub image_count: usize,
    pub title: String,
    pub description: String,
}
