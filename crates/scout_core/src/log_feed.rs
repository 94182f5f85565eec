use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum LogLevel {
    #[default]
    Info,
    Debug,
    Warning,
    Error,
    /// Any level name the server sends that we do not style specially.
    Other(String),
}

impl From<String> for LogLevel {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "warning" | "warn" => LogLevel::Warning,
            "error" => LogLevel::Error,
            _ => LogLevel::Other(raw),
        }
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Other(raw) => raw,
        }
    }
}

/// One user-visible log line, either pushed by the server or raised locally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogEvent {
    pub message: String,
    #[serde(default)]
    pub level: LogLevel,
}

impl LogEvent {
    pub fn new(message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, LogLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, LogLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, LogLevel::Error)
    }
}

/// Append-only log in arrival order. Unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogFeed {
    lines: Vec<LogEvent>,
}

impl LogFeed {
    pub fn append(&mut self, event: LogEvent) {
        self.lines.push(event);
    }

    pub fn lines(&self) -> &[LogEvent] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index the view scrolls to: always the newest line.
    pub fn follow_index(&self) -> Option<usize> {
        self.lines.len().checked_sub(1)
    }
}
