use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use scout_app::bindings::{Surface, ViewBindings};
use scout_app::config::SurfaceConfig;
use scout_app::render::Frame;
use tempfile::TempDir;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn each_section_goes_to_its_surface() {
    let chat = SharedBuffer::default();
    let log = SharedBuffer::default();
    let mut bindings = ViewBindings::unbound();
    bindings.chat = Some(Surface::new("chat", Box::new(chat.clone())));
    bindings.log = Some(Surface::new("log", Box::new(log.clone())));

    bindings.present(&Frame {
        chat: vec!["you> hi".into()],
        log: vec!["[info] one".into(), "[info] two".into()],
        tree: vec!["  1. [+] output (folder)".into()],
        ..Frame::default()
    });

    assert_eq!(chat.text(), "you> hi\n");
    assert_eq!(log.text(), "[info] one\n[info] two\n");
}

#[test]
fn failing_surface_is_dropped_alone() {
    let chat = SharedBuffer::default();
    let mut bindings = ViewBindings::unbound();
    bindings.chat = Some(Surface::new("chat", Box::new(chat.clone())));
    bindings.log = Some(Surface::new("log", Box::new(BrokenPipe)));

    bindings.present(&Frame {
        chat: vec!["agent> hello".into()],
        log: vec!["[info] lost".into()],
        ..Frame::default()
    });

    assert!(bindings.log.is_none());
    assert!(bindings.chat.is_some());
    assert_eq!(chat.text(), "agent> hello\n");
}

#[test]
fn disabled_and_unopenable_surfaces_resolve_to_none() {
    let temp = TempDir::new().unwrap();
    let config = SurfaceConfig {
        tree: false,
        log_file: Some(temp.path().join("missing_dir").join("job.log")),
        ..SurfaceConfig::default()
    };

    let bindings = ViewBindings::from_config(&config);
    assert!(bindings.tree.is_none());
    assert!(bindings.log.is_none());
    assert!(bindings.chat.is_some());
    assert!(bindings.progress.is_some());
}
