//! Where each part of the view is drawn.
//!
//! Bindings are resolved once at startup. Every surface is optional: one that
//! is disabled, or whose writer cannot be opened or later fails, is dropped
//! with a warning and the rest of the interface carries on without it.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use scout_logging::{scout_info, scout_warn};

use crate::config::SurfaceConfig;
use crate::render::Frame;

pub struct Surface {
    name: &'static str,
    out: Box<dyn Write + Send>,
}

impl Surface {
    pub fn new(name: &'static str, out: Box<dyn Write + Send>) -> Self {
        Self { name, out }
    }

    pub fn stdout(name: &'static str) -> Self {
        Self::new(name, Box::new(io::stdout()))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

pub struct ViewBindings {
    pub status: Option<Surface>,
    pub chat: Option<Surface>,
    pub log: Option<Surface>,
    pub progress: Option<Surface>,
    pub tree: Option<Surface>,
}

impl ViewBindings {
    pub fn from_config(config: &SurfaceConfig) -> Self {
        let enabled = |on: bool, name: &'static str| {
            if on {
                Some(Surface::stdout(name))
            } else {
                scout_info!("{} surface disabled by config", name);
                None
            }
        };
        let log = match (&config.log_file, config.log) {
            (_, false) => enabled(false, "log"),
            (Some(path), true) => open_log_file(path),
            (None, true) => Some(Surface::stdout("log")),
        };

        Self {
            status: Some(Surface::stdout("status")),
            chat: enabled(config.chat, "chat"),
            log,
            progress: enabled(config.progress, "progress"),
            tree: enabled(config.tree, "tree"),
        }
    }

    pub fn unbound() -> Self {
        Self {
            status: None,
            chat: None,
            log: None,
            progress: None,
            tree: None,
        }
    }

    /// Draw a frame. A surface whose writer fails is unbound.
    pub fn present(&mut self, frame: &Frame) {
        present_on(&mut self.status, &frame.status);
        present_on(&mut self.chat, &frame.chat);
        present_on(&mut self.progress, &frame.progress);
        present_on(&mut self.tree, &frame.tree);
        present_on(&mut self.log, &frame.log);
    }

    /// Print lines that are not part of the view, such as help or input errors.
    pub fn notice(&mut self, lines: &[String]) {
        present_on(&mut self.status, lines);
    }
}

fn present_on(slot: &mut Option<Surface>, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    if let Some(surface) = slot {
        if let Err(err) = surface.write_lines(lines) {
            scout_warn!("{} surface failed and is now off: {}", surface.name(), err);
            *slot = None;
        }
    }
}

fn open_log_file(path: &Path) -> Option<Surface> {
    match File::create(path) {
        Ok(file) => {
            scout_info!("Job log goes to {:?}", path);
            Some(Surface::new("log", Box::new(BufWriter::new(file))))
        }
        Err(err) => {
            scout_warn!("Could not open job log file {:?}: {}; log surface is off", path, err);
            None
        }
    }
}
