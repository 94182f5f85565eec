use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub author: Author,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            text: text.into(),
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            author: Author::Agent,
            text: text.into(),
        }
    }
}

/// A website the agent proposed, with the user's selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteCandidate {
    pub url: String,
    pub selected: bool,
}

/// Body of a successful `/api/chat` call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub websites: Vec<String>,
}

/// Body of a successful `/api/scrape` call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScrapeReport {
    pub analyzed_data: Vec<AnalyzedSite>,
    #[serde(default)]
    pub session_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalyzedSite {
    pub url: String,
    #[serde(default)]
    pub relevance_score: f64,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub metadata: SiteMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ImageRef {
    pub url: Option<String>,
    pub stored_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SiteMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Structured error body of a failed submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ScrapeRejection {
    pub message: Option<String>,
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Vec<SourceError>,
}

impl ScrapeRejection {
    pub fn summary(&self) -> &str {
        self.message
            .as_deref()
            .filter(|text| !text.is_empty())
            .or_else(|| self.error.as_deref().filter(|text| !text.is_empty()))
            .unwrap_or("Unknown error occurred")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceError {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeFailure {
    /// The backend answered with an error payload.
    Rejected(ScrapeRejection),
    /// No usable answer: network error or unparseable body.
    Transport(String),
}
