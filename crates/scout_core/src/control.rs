/// Client-local pause and cancel toggles. Nothing here reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobControlState {
    paused: bool,
    cancel_pending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEmphasis {
    /// Job is running; the button offers to pause it.
    Caution,
    /// Job is paused; the button offers to resume it.
    Proceed,
}

impl JobControlState {
    /// Flip the pause flag and return the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause_label(&self) -> &'static str {
        if self.paused {
            "Resume"
        } else {
            "Pause"
        }
    }

    pub fn pause_emphasis(&self) -> ControlEmphasis {
        if self.paused {
            ControlEmphasis::Proceed
        } else {
            ControlEmphasis::Caution
        }
    }

    pub fn request_cancel(&mut self) {
        self.cancel_pending = true;
    }

    /// Resolve a pending confirmation; returns whether one was pending.
    pub fn resolve_cancel(&mut self) -> bool {
        std::mem::replace(&mut self.cancel_pending, false)
    }

    pub fn is_cancel_pending(&self) -> bool {
        self.cancel_pending
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
