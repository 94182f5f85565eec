use std::path::Path;

use scout_logging::{scout_debug, scout_warn};

use crate::view_model::{
    AppViewModel, ChatView, ControlsView, DrawerView, LogView, ProgressView, ResultRowView,
};
use crate::{
    save_name, AnalyzedSite, ChatMessage, ConnectionState, Effect, ExpansionState, FileTree,
    JobControlState, LogEvent, LogFeed, NodeKind, ProgressEvent, ProgressState, TreeNode,
    WebsiteCandidate, LOST_CONNECTION_MESSAGE,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    connection: ConnectionState,
    progress: ProgressState,
    controls: JobControlState,
    log: LogFeed,
    log_visible: bool,
    drawer_open: bool,
    tree: FileTree,
    expansion: ExpansionState,
    tree_request: u64,
    tree_loading: bool,
    chat: Vec<ChatMessage>,
    chat_pending: bool,
    candidates: Vec<WebsiteCandidate>,
    scrape_pending: bool,
    results: Vec<AnalyzedSite>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            connection: self.connection,
            progress: ProgressView {
                visible: self.progress.is_visible(),
                percent: self.progress.percent(),
                status_text: self.progress.status_text().to_string(),
                stats: self.progress.stats(),
            },
            controls: ControlsView {
                paused: self.controls.is_paused(),
                pause_label: self.controls.pause_label(),
                pause_emphasis: self.controls.pause_emphasis(),
                cancel_pending: self.controls.is_cancel_pending(),
                enabled: self.progress.is_visible(),
            },
            log: LogView {
                visible: self.log_visible,
                len: self.log.len(),
                follow_index: self.log.follow_index(),
            },
            drawer: DrawerView {
                open: self.drawer_open,
                loading: self.tree_loading,
                rows: if self.drawer_open {
                    self.tree.visible_rows(&self.expansion)
                } else {
                    Vec::new()
                },
            },
            chat: ChatView {
                messages: self.chat.clone(),
                pending: self.chat_pending,
            },
            candidates: self.candidates.clone(),
            scrape_enabled: !self.scrape_pending && !self.candidates.is_empty(),
            results: self.results.iter().map(result_row).collect(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn log(&self) -> &LogFeed {
        &self.log
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_connection(&mut self, next: ConnectionState) {
        if self.connection == ConnectionState::Failed || self.connection == next {
            return;
        }
        self.connection = next;
        self.mark_dirty();
    }

    /// Move to `Failed` and raise the lost-connection line, once per session.
    pub(crate) fn fail_connection(&mut self) {
        if self.connection == ConnectionState::Failed {
            return;
        }
        self.connection = ConnectionState::Failed;
        self.append_log(LogEvent::error(LOST_CONNECTION_MESSAGE));
    }

    pub(crate) fn append_log(&mut self, event: LogEvent) {
        self.log.append(event);
        self.mark_dirty();
    }

    pub(crate) fn show_log(&mut self) {
        if !self.log_visible {
            self.log_visible = true;
            self.mark_dirty();
        }
    }

    pub(crate) fn hide_log(&mut self) {
        if self.log_visible {
            self.log_visible = false;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_progress(&mut self, event: ProgressEvent) -> Option<u64> {
        self.mark_dirty();
        self.progress.apply(event)
    }

    pub(crate) fn progress_hide_elapsed(&mut self, generation: u64) {
        if self.progress.hide_elapsed(generation) {
            self.controls.reset();
            self.mark_dirty();
        }
    }

    pub(crate) fn toggle_pause(&mut self) {
        if !self.progress.is_visible() {
            return;
        }
        let paused = self.controls.toggle_pause();
        self.append_log(LogEvent::info(if paused {
            "Job paused"
        } else {
            "Job resumed"
        }));
    }

    pub(crate) fn request_cancel(&mut self) {
        if !self.progress.is_visible() || self.controls.is_cancel_pending() {
            return;
        }
        self.controls.request_cancel();
        self.mark_dirty();
    }

    pub(crate) fn confirm_cancel(&mut self) {
        if !self.controls.resolve_cancel() {
            return;
        }
        self.controls.reset();
        self.progress.hide_now();
        self.append_log(LogEvent::warning("Job cancelled"));
    }

    pub(crate) fn dismiss_cancel(&mut self) {
        if self.controls.resolve_cancel() {
            self.mark_dirty();
        }
    }

    /// Open or close the drawer. Opening starts a fresh tree query.
    pub(crate) fn toggle_drawer(&mut self) -> Vec<Effect> {
        if self.drawer_open {
            self.close_drawer();
            return Vec::new();
        }
        self.drawer_open = true;
        self.expansion.clear();
        self.tree_request += 1;
        self.tree_loading = true;
        self.mark_dirty();
        vec![Effect::FetchTree {
            request_id: self.tree_request,
        }]
    }

    pub(crate) fn close_drawer(&mut self) {
        if !self.drawer_open {
            return;
        }
        self.drawer_open = false;
        self.expansion.clear();
        self.tree_loading = false;
        self.mark_dirty();
    }

    pub(crate) fn tree_loaded(&mut self, request_id: u64, root: TreeNode) {
        if request_id != self.tree_request {
            scout_debug!(
                "Ignoring stale tree response {} (latest {})",
                request_id,
                self.tree_request
            );
            return;
        }
        self.tree = FileTree::from_root(root);
        self.tree_loading = false;
        self.mark_dirty();
    }

    pub(crate) fn tree_load_failed(&mut self, request_id: u64, error: &str) {
        if request_id != self.tree_request {
            return;
        }
        self.tree_loading = false;
        self.append_log(LogEvent::error(format!(
            "Failed to update folder structure: {error}"
        )));
    }

    pub(crate) fn toggle_directory(&mut self, path: &str) {
        let Some(id) = self.tree.lookup(path) else {
            scout_warn!("Toggle for unknown tree path {:?}", path);
            return;
        };
        if self.tree.kind(id) != Some(NodeKind::Directory) {
            return;
        }
        self.expansion.toggle(path);
        self.mark_dirty();
    }

    /// Build the download effect for a row. Expansion is never touched.
    pub(crate) fn download_effect(&self, path: &str) -> Option<Effect> {
        let Some(id) = self.tree.lookup(path) else {
            scout_warn!("Download for unknown tree path {:?}", path);
            return None;
        };
        let kind = self.tree.kind(id)?;
        let name = self.tree.name(id)?.to_string();
        let save_as = save_name(kind, &name);
        let path = path.to_string();
        Some(match kind {
            NodeKind::File => Effect::DownloadFile {
                path,
                name,
                save_as,
            },
            NodeKind::Directory => Effect::DownloadArchive {
                path,
                name,
                save_as,
            },
        })
    }

    pub(crate) fn download_finished(&mut self, name: &str, result: Result<&Path, &str>) {
        match result {
            Ok(saved) => self.append_log(LogEvent::info(format!(
                "Downloaded {name} to {}",
                saved.display()
            ))),
            Err(error) => {
                self.append_log(LogEvent::error(format!(
                    "Failed to download {name}: {error}"
                )));
            }
        }
    }

    /// Record a user chat message; returns the trimmed text to send.
    pub(crate) fn submit_chat(&mut self, raw: &str) -> Option<String> {
        let message = raw.trim();
        if message.is_empty() {
            return None;
        }
        self.chat.push(ChatMessage::user(message));
        self.chat_pending = true;
        self.mark_dirty();
        Some(message.to_string())
    }

    pub(crate) fn chat_replied(&mut self, response: String, websites: Vec<String>) {
        self.chat_pending = false;
        self.chat.push(ChatMessage::agent(response));
        if !websites.is_empty() {
            self.candidates = websites
                .into_iter()
                .map(|url| WebsiteCandidate {
                    url,
                    selected: true,
                })
                .collect();
        }
        self.mark_dirty();
    }

    pub(crate) fn chat_failed(&mut self, error: &str) {
        self.chat_pending = false;
        self.push_agent_message("Error processing your request. Please try again.");
        self.append_log(LogEvent::error(format!("Chat error: {error}")));
    }

    pub(crate) fn push_agent_message(&mut self, text: &str) {
        self.chat.push(ChatMessage::agent(text));
        self.mark_dirty();
    }

    pub(crate) fn toggle_candidate(&mut self, index: usize) {
        if let Some(candidate) = self.candidates.get_mut(index) {
            candidate.selected = !candidate.selected;
            self.mark_dirty();
        }
    }

    pub(crate) fn is_scrape_pending(&self) -> bool {
        self.scrape_pending
    }

    pub(crate) fn selected_websites(&self) -> Vec<String> {
        self.candidates
            .iter()
            .filter(|candidate| candidate.selected)
            .map(|candidate| candidate.url.clone())
            .collect()
    }

    pub(crate) fn begin_scrape(&mut self) {
        self.scrape_pending = true;
        self.progress.begin_job();
        self.controls.reset();
        self.append_log(LogEvent::info("Starting web scraping process..."));
    }

    /// Submission answered, either way: drop the busy state.
    pub(crate) fn end_scrape(&mut self) {
        self.scrape_pending = false;
        self.progress.hide_now();
        self.controls.reset();
        self.mark_dirty();
    }

    pub(crate) fn store_results(&mut self, results: Vec<AnalyzedSite>) {
        self.results = results;
        self.candidates.clear();
        self.mark_dirty();
    }
}

fn result_row(site: &AnalyzedSite) -> ResultRowView {
    ResultRowView {
        url: site.url.clone(),
        relevance: format!("{:.2}", site.relevance_score),
        image_count: site.images.len(),
        title: non_empty_or_na(site.metadata.title.as_deref()),
        description: non_empty_or_na(site.metadata.description.as_deref()),
    }
}

fn non_empty_or_na(value: Option<&str>) -> String {
    value
        .filter(|text| !text.is_empty())
        .unwrap_or("N/A")
        .to_string()
}
