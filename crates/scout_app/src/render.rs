//! Turns successive view models into lines of terminal output.
//!
//! Output is incremental: each frame only carries what changed since the
//! previous view, so the terminal reads like a transcript.

use scout_core::{
    AppViewModel, Author, ChatView, ControlsView, DrawerView, FileCategory, LogEvent, LogLevel,
    NodeKind, ProgressView, ResultRowView, TreeRowView, WebsiteCandidate,
};

const INDENT: &str = "  ";
const BAR_WIDTH: usize = 20;

/// Lines to print, grouped by the surface they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub status: Vec<String>,
    pub chat: Vec<String>,
    pub log: Vec<String>,
    pub progress: Vec<String>,
    pub tree: Vec<String>,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
            && self.chat.is_empty()
            && self.log.is_empty()
            && self.progress.is_empty()
            && self.tree.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Renderer {
    previous: Option<AppViewModel>,
    // Log lines already printed.
    log_printed: usize,
    // Lines checked for errors; errors print even while the log is closed.
    log_scanned: usize,
    // Set once the user closes the log panel; other lines wait until it reopens.
    log_suppressed: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `log` is the full job log; `view.log.len` says how much of it exists.
    pub fn frame(&mut self, view: &AppViewModel, log: &[LogEvent]) -> Frame {
        let previous = self.previous.take();
        let prev = previous.as_ref();

        let mut frame = Frame::default();
        if prev.map(|p| p.connection) != Some(view.connection) {
            frame
                .status
                .push(format!("[server: {}]", view.connection.label()));
        }
        frame.chat = chat_delta(prev, view);
        let log = &log[..view.log.len.min(log.len())];
        frame.log = self.log_delta(prev.is_some_and(|p| p.log.visible), view.log.visible, log);
        frame.progress = progress_delta(prev.map(|p| (&p.progress, &p.controls)), view);
        frame.tree = tree_delta(prev.map(|p| &p.drawer), &view.drawer);

        self.previous = Some(view.clone());
        frame
    }

    fn log_delta(&mut self, was_visible: bool, visible: bool, log: &[LogEvent]) -> Vec<String> {
        let mut lines = Vec::new();
        if was_visible && !visible {
            self.log_suppressed = true;
            lines.push("(job log closed)".to_string());
        } else if !was_visible && visible {
            self.log_suppressed = false;
            lines.push("--- job log ---".to_string());
        }

        let scanned = self.log_scanned.min(log.len());
        if self.log_suppressed {
            lines.extend(log[scanned..].iter().filter(|e| is_error(e)).map(log_line));
            self.log_scanned = log.len();
            return lines;
        }

        let start = self.log_printed.min(log.len());
        for (index, event) in log.iter().enumerate().skip(start) {
            if index < scanned && is_error(event) {
                continue;
            }
            lines.push(log_line(event));
        }
        self.log_printed = log.len();
        self.log_scanned = log.len();
        lines
    }
}

fn is_error(event: &LogEvent) -> bool {
    event.level == LogLevel::Error
}

pub fn log_line(event: &LogEvent) -> String {
    format!("[{}] {}", event.level.as_str(), event.message)
}

fn chat_delta(prev: Option<&AppViewModel>, view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    let empty_chat = ChatView::default();
    let prev_chat = prev.map_or(&empty_chat, |p| &p.chat);

    let seen = prev_chat.messages.len().min(view.chat.messages.len());
    for message in &view.chat.messages[seen..] {
        let who = match message.author {
            Author::User => "you",
            Author::Agent => "agent",
        };
        lines.push(format!("{who}> {}", message.text));
    }
    if view.chat.pending && !prev_chat.pending {
        lines.push("agent is thinking...".to_string());
    }

    let prev_candidates = prev.map_or(&[][..], |p| &p.candidates[..]);
    if view.candidates != prev_candidates && !view.candidates.is_empty() {
        lines.extend(candidate_lines(&view.candidates));
    }

    let prev_results = prev.map_or(&[][..], |p| &p.results[..]);
    if view.results != prev_results && !view.results.is_empty() {
        lines.extend(result_lines(&view.results));
    }
    lines
}

pub fn candidate_lines(candidates: &[WebsiteCandidate]) -> Vec<String> {
    let mut lines = vec!["Proposed websites (/select N to toggle, /scrape to start):".to_string()];
    for (index, candidate) in candidates.iter().enumerate() {
        let mark = if candidate.selected { 'x' } else { ' ' };
        lines.push(format!("{INDENT}[{mark}] {}. {}", index + 1, candidate.url));
    }
    lines
}

pub fn result_lines(results: &[ResultRowView]) -> Vec<String> {
    let mut lines = vec!["Analysis results:".to_string()];
    for (index, row) in results.iter().enumerate() {
        lines.push(format!(
            "{INDENT}{}. {} | relevance {} | {} images | {} | {}",
            index + 1,
            row.url,
            row.relevance,
            row.image_count,
            row.title,
            row.description
        ));
    }
    lines
}

fn progress_delta(
    prev: Option<(&ProgressView, &ControlsView)>,
    view: &AppViewModel,
) -> Vec<String> {
    let mut lines = Vec::new();
    let hidden = ProgressView::default();
    let idle = ControlsView::default();
    let (prev_progress, prev_controls) = prev.unwrap_or((&hidden, &idle));

    if view.progress.visible {
        if !prev_progress.visible || *prev_progress != view.progress {
            lines.push(progress_line(&view.progress));
        }
    } else if prev_progress.visible {
        lines.push("(progress hidden)".to_string());
    }

    let controls = &view.controls;
    if controls.paused != prev_controls.paused {
        lines.push(if controls.paused {
            "Job paused. /pause to resume.".to_string()
        } else {
            "Job running. /pause to pause.".to_string()
        });
    }
    if controls.cancel_pending && !prev_controls.cancel_pending {
        lines.push("Cancel the running job? /yes to confirm, /no to keep it.".to_string());
    }
    lines
}

pub fn progress_line(progress: &ProgressView) -> String {
    let filled = ((progress.percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    let mut line = format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress.percent
    );
    if !progress.status_text.is_empty() {
        line.push(' ');
        line.push_str(&progress.status_text);
    }
    let stats = &progress.stats;
    let counters = [
        ("processed", stats.processed),
        ("ok", stats.successful),
        ("failed", stats.failed),
    ];
    for (label, value) in counters {
        if let Some(value) = value {
            line.push_str(&format!(" | {label} {value}"));
        }
    }
    line
}

fn tree_delta(prev: Option<&DrawerView>, drawer: &DrawerView) -> Vec<String> {
    let closed = DrawerView::default();
    let prev = prev.unwrap_or(&closed);

    if !drawer.open {
        return if prev.open {
            vec!["(files closed)".to_string()]
        } else {
            Vec::new()
        };
    }

    let mut lines = Vec::new();
    if drawer.loading && !prev.loading {
        lines.push("Loading folder structure...".to_string());
    }
    if drawer.loading {
        return lines;
    }
    let opened = !prev.open;
    let settled = prev.loading;
    if opened || settled || drawer.rows != prev.rows {
        lines.extend(tree_lines(&drawer.rows));
    }
    lines
}

/// Numbered rows; `/toggle N` and `/get N` refer to these numbers.
pub fn tree_lines(rows: &[TreeRowView]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["(no files)".to_string()];
    }
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let marker = match (row.kind, row.expanded) {
                (NodeKind::Directory, true) => "[-]",
                (NodeKind::Directory, false) => "[+]",
                (NodeKind::File, _) => "   ",
            };
            format!(
                "{:>3}. {}{} {} ({})",
                index + 1,
                INDENT.repeat(row.depth),
                marker,
                row.label,
                category_tag(row.category)
            )
        })
        .collect()
}

fn category_tag(category: FileCategory) -> &'static str {
    match category {
        FileCategory::Folder => "folder",
        FileCategory::Text => "text",
        FileCategory::Markup => "markup",
        FileCategory::Data => "data",
        FileCategory::Image => "image",
        FileCategory::Pdf => "pdf",
        FileCategory::Archive => "archive",
        FileCategory::Code => "code",
        FileCategory::Generic => "file",
    }
}

pub const HELP: &[&str] = &[
    "Type a message to chat with the agent.",
    "/select N   toggle proposed website N",
    "/scrape     analyze the selected websites",
    "/files      open or close the file browser",
    "/toggle N   expand or collapse directory N",
    "/get N      download file N (directories as .zip)",
    "/pause      pause or resume the job",
    "/cancel     cancel the job (asks first)",
    "/closelog   close the job log",
    "/quit       exit",
];
