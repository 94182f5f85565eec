//! Line-oriented user input: chat text or a `/command`.

use scout_core::{AppViewModel, Msg};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Chat(String),
    Files,
    Toggle(usize),
    Get(usize),
    Select(usize),
    Scrape,
    Pause,
    Cancel,
    Confirm,
    Dismiss,
    CloseLog,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command /{0} (try /help)")]
    Unknown(String),
    #[error("/{0} needs a number")]
    MissingNumber(&'static str),
    #[error("{0:?} is not a number")]
    BadNumber(String),
    #[error("there is no row {0}")]
    NoSuchRow(usize),
    #[error("there is no website {0}")]
    NoSuchWebsite(usize),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Chat(line.to_string())));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let argument = parts.next();
    let command = match name.as_str() {
        "files" | "drawer" => Command::Files,
        "toggle" => Command::Toggle(number("toggle", argument)?),
        "get" => Command::Get(number("get", argument)?),
        "select" => Command::Select(number("select", argument)?),
        "scrape" => Command::Scrape,
        "pause" | "resume" => Command::Pause,
        "cancel" => Command::Cancel,
        "yes" => Command::Confirm,
        "no" => Command::Dismiss,
        "closelog" => Command::CloseLog,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(InputError::Unknown(name)),
    };
    Ok(Some(command))
}

fn number(command: &'static str, argument: Option<&str>) -> Result<usize, InputError> {
    let raw = argument.ok_or(InputError::MissingNumber(command))?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(InputError::BadNumber(raw.to_string())),
    }
}

/// Map a command to the message it stands for, resolving row and website
/// numbers against what is currently on screen. `Help` and `Quit` are
/// handled by the shell and map to `None`.
pub fn command_to_msg(command: Command, view: &AppViewModel) -> Result<Option<Msg>, InputError> {
    let row_path = |n: usize| {
        view.drawer
            .rows
            .get(n - 1)
            .map(|row| row.path.clone())
            .ok_or(InputError::NoSuchRow(n))
    };

    let msg = match command {
        Command::Chat(text) => Msg::ChatSubmitted(text),
        Command::Files => Msg::DrawerToggled,
        Command::Toggle(n) => Msg::DirectoryToggled { path: row_path(n)? },
        Command::Get(n) => Msg::DownloadRequested { path: row_path(n)? },
        Command::Select(n) => {
            if n > view.candidates.len() {
                return Err(InputError::NoSuchWebsite(n));
            }
            Msg::WebsiteToggled { index: n - 1 }
        }
        Command::Scrape => Msg::ScrapeSubmitted,
        Command::Pause => Msg::PauseToggled,
        Command::Cancel => Msg::CancelRequested,
        Command::Confirm => Msg::CancelConfirmed,
        Command::Dismiss => Msg::CancelDismissed,
        Command::CloseLog => Msg::LogPanelClosed,
        Command::Help | Command::Quit => return Ok(None),
    };
    Ok(Some(msg))
}
