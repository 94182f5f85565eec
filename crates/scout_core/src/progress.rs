use std::time::Duration;

use serde::Deserialize;

/// Grace period between a `complete` status and the progress surface hiding.
pub const PROGRESS_HIDE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum JobStatus {
    Running,
    Complete,
    Other(String),
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "running" => JobStatus::Running,
            "complete" => JobStatus::Complete,
            _ => JobStatus::Other(raw),
        }
    }
}

/// Per-source counters. Each key is optional on the wire and merges on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ProgressStats {
    pub processed: Option<u64>,
    pub successful: Option<u64>,
    pub failed: Option<u64>,
}

impl ProgressStats {
    fn merge(&mut self, update: ProgressStats) {
        if let Some(processed) = update.processed {
            self.processed = Some(processed);
        }
        if let Some(successful) = update.successful {
            self.successful = Some(successful);
        }
        if let Some(failed) = update.failed {
            self.failed = Some(failed);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProgressEvent {
    pub progress: Option<f64>,
    pub message: Option<String>,
    pub status: Option<JobStatus>,
    pub stats: Option<ProgressStats>,
}

/// What the job is doing right now, as last reported.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressState {
    visible: bool,
    percent: f64,
    status_text: String,
    status: Option<JobStatus>,
    stats: ProgressStats,
    hide_generation: u64,
    hide_pending: bool,
}

impl ProgressState {
    /// Apply one event, last write wins. Returns the generation of a hide
    /// timer to start when the event reports completion.
    pub fn apply(&mut self, event: ProgressEvent) -> Option<u64> {
        if let Some(progress) = event.progress.filter(|value| !value.is_nan()) {
            self.percent = progress.clamp(0.0, 100.0);
        }
        if let Some(message) = event.message.filter(|message| !message.is_empty()) {
            self.status_text = message;
        }
        if let Some(stats) = event.stats {
            self.stats.merge(stats);
        }
        self.visible = true;

        match event.status {
            Some(JobStatus::Complete) => {
                self.status = Some(JobStatus::Complete);
                self.hide_generation += 1;
                self.hide_pending = true;
                Some(self.hide_generation)
            }
            Some(status) => {
                self.status = Some(status);
                self.hide_pending = false;
                None
            }
            None => None,
        }
    }

    /// Collapse the surface if `generation` is still the pending hide.
    pub fn hide_elapsed(&mut self, generation: u64) -> bool {
        if !self.hide_pending || generation != self.hide_generation {
            return false;
        }
        self.hide_now();
        true
    }

    pub fn hide_now(&mut self) {
        self.visible = false;
        self.hide_pending = false;
        self.percent = 0.0;
    }

    /// Reset for a freshly submitted job and show the surface.
    pub fn begin_job(&mut self) {
        self.visible = true;
        self.hide_pending = false;
        self.percent = 0.0;
        self.status_text.clear();
        self.status = None;
        self.stats = ProgressStats::default();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn status(&self) -> Option<&JobStatus> {
        self.status.as_ref()
    }

    pub fn stats(&self) -> ProgressStats {
        self.stats
    }

    pub fn hide_pending(&self) -> bool {
        self.hide_pending
    }
}
