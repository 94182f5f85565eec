//! Client configuration: an optional RON file, then command-line overrides.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, TimeZone};
use clap::Parser;
use log::LevelFilter;
use scout_core::ReconnectPolicy;
use scout_engine::ClientSettings;
use scout_logging::{scout_debug, LogDestination};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "scout.ron";
const SESSION_DIR_FORMAT: &str = "session_%Y%m%d_%H%M%S";

/// Terminal client for the Site Scout backend
#[derive(Parser, Debug, Default)]
#[command(name = "scout")]
#[command(version)]
pub struct Cli {
    /// Backend base URL, e.g. http://localhost:5000
    #[arg(short, long)]
    pub server: Option<String>,

    /// Config file (RON). Defaults to ./scout.ron when present
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Root directory for downloads; each session gets its own subdirectory
    #[arg(short, long)]
    pub download_dir: Option<PathBuf>,

    /// Write diagnostics to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Debug-level diagnostics
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub server: String,
    pub reconnect_base_delay_ms: u64,
    pub max_reconnect_attempts: u32,
    pub request_timeout_secs: u64,
    pub download_root: PathBuf,
    pub surfaces: SurfaceConfig,
    pub log: LogConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let policy = ReconnectPolicy::default();
        Self {
            server: "http://localhost:5000".to_string(),
            reconnect_base_delay_ms: policy.base_delay.as_millis() as u64,
            max_reconnect_attempts: policy.max_attempts,
            request_timeout_secs: 120,
            download_root: PathBuf::from("downloads"),
            surfaces: SurfaceConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// Which parts of the view are shown. A disabled surface is simply not drawn.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceConfig {
    pub chat: bool,
    pub log: bool,
    pub progress: bool,
    pub tree: bool,
    /// Send the job log to this file instead of the terminal.
    pub log_file: Option<PathBuf>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            chat: true,
            log: true,
            progress: true,
            tree: true,
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
    Off,
}

/// Developer diagnostics, separate from the job log the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub target: LogTarget,
    pub file: PathBuf,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            target: LogTarget::File,
            file: PathBuf::from("scout.log"),
            level: "info".to_string(),
        }
    }
}

impl LogConfig {
    pub fn destination(&self) -> LogDestination {
        match self.target {
            LogTarget::File => LogDestination::File(self.file.clone()),
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both(self.file.clone()),
            LogTarget::Off => LogDestination::Off,
        }
    }

    pub fn level(&self) -> Result<LevelFilter> {
        self.level
            .parse()
            .map_err(|_| anyhow!("unknown log level {:?}", self.level))
    }
}

impl ClientConfig {
    /// Read `path`, or `scout.ron` when no path is given.
    ///
    /// Only the implicit default file may be missing; an explicit path that
    /// does not exist is an error, as is any file that fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound && !required => {
                scout_debug!("No config file at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config file {}", path.display()))
            }
        };
        Self::parse(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(server) = &cli.server {
            self.server = server.clone();
        }
        if let Some(dir) = &cli.download_dir {
            self.download_root = dir.clone();
        }
        if let Some(file) = &cli.log_file {
            self.log.file = file.clone();
            self.log.target = match self.log.target {
                LogTarget::Terminal | LogTarget::Both => LogTarget::Both,
                LogTarget::File | LogTarget::Off => LogTarget::File,
            };
        }
        if cli.verbose {
            self.log.level = "debug".to_string();
        }
        self
    }

    /// `download_root/session_YYYYmmdd_HHMMSS` for a session started at `now`.
    pub fn download_dir_for<Tz: TimeZone>(&self, now: DateTime<Tz>) -> PathBuf
    where
        Tz::Offset: std::fmt::Display,
    {
        self.download_root
            .join(now.format(SESSION_DIR_FORMAT).to_string())
    }

    pub fn client_settings(&self, download_dir: PathBuf) -> Result<ClientSettings> {
        let mut settings = ClientSettings::parse(&self.server, download_dir)
            .with_context(|| format!("invalid server URL {:?}", self.server))?;
        settings.reconnect = ReconnectPolicy {
            base_delay: Duration::from_millis(self.reconnect_base_delay_ms),
            max_attempts: self.max_reconnect_attempts,
        };
        settings.request_timeout = Duration::from_secs(self.request_timeout_secs);
        Ok(settings)
    }
}
