use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use scout_core::{update, AppState, Msg};
use scout_logging::{scout_debug, scout_info};

use crate::bindings::ViewBindings;
use crate::config::ClientConfig;
use crate::effects::EffectRunner;
use crate::input::{command_to_msg, parse_line, Command};
use crate::render::{Renderer, HELP};

/// How often engine results are drained while waiting for input.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run(config: &ClientConfig, download_dir: PathBuf) -> Result<()> {
    let settings = config.client_settings(download_dir)?;
    let runner = EffectRunner::new(settings).context("starting the engine")?;
    let mut shell = Shell::new(runner, ViewBindings::from_config(&config.surfaces));
    let lines = spawn_stdin_reader();

    shell.notice(&["Type /help for commands.".to_string()]);
    shell.dispatch_msg(Msg::SessionStarted);
    loop {
        match lines.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                if shell.handle_line(&line) == Flow::Quit {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                scout_info!("Input closed");
                break;
            }
        }
        shell.pump_engine();
    }
    shell.dispatch_msg(Msg::SessionEnded);
    scout_info!("Session ended");
    Ok(())
}

struct Shell {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
    bindings: ViewBindings,
}

impl Shell {
    fn new(runner: EffectRunner, bindings: ViewBindings) -> Self {
        let mut shell = Self {
            state: AppState::new(),
            runner,
            renderer: Renderer::new(),
            bindings,
        };
        let view = shell.state.view();
        let frame = shell.renderer.frame(&view, shell.state.log().lines());
        shell.bindings.present(&frame);
        shell
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(err) => {
                self.notice(&[err.to_string()]);
                return Flow::Continue;
            }
        };
        match command {
            Command::Quit => return Flow::Quit,
            Command::Help => {
                let help: Vec<String> = HELP.iter().map(|line| line.to_string()).collect();
                self.notice(&help);
                return Flow::Continue;
            }
            _ => {}
        }
        match command_to_msg(command, &self.state.view()) {
            Ok(Some(msg)) => self.dispatch_msg(msg),
            Ok(None) => {}
            Err(err) => self.notice(&[err.to_string()]),
        }
        Flow::Continue
    }

    fn pump_engine(&mut self) {
        for msg in self.runner.drain() {
            self.dispatch_msg(msg);
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        scout_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = was_dirty.then(|| state.view());
        self.state = state;

        self.runner.enqueue(effects);
        if let Some(view) = view {
            let frame = self.renderer.frame(&view, self.state.log().lines());
            self.bindings.present(&frame);
        }
    }

    fn notice(&mut self, lines: &[String]) {
        self.bindings.notice(lines);
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
