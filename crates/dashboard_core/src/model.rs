use std::path::{Path, PathBuf};

/// Identifies one submitted query; completions carry it back.
pub type QueryId = u64;

/// File extensions accepted for upload, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "md", "markdown"];

/// Lifecycle of the retrieve-then-generate chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryPhase {
    #[default]
    Idle,
    Retrieving,
    Generating,
    Done,
    Failed,
}

impl QueryPhase {
    pub fn is_in_flight(self) -> bool {
        matches!(self, QueryPhase::Retrieving | QueryPhase::Generating)
    }
}

pub const DEFAULT_TOP_K: u32 = 5;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Request parameters sent with every query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub top_k: u32,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// A file chosen by the user, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            path: path.to_path_buf(),
        }
    }

    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    pub fn is_supported(&self) -> bool {
        self.extension()
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatusKind {
    Success,
    Error,
}

/// Outcome of the most recent upload attempt or file selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadStatus {
    pub kind: UploadStatusKind,
    pub message: String,
}

impl UploadStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: UploadStatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: UploadStatusKind::Error,
            message: message.into(),
        }
    }
}

/// What the ingestion endpoint reports after indexing a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub chunks: u64,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub text: String,
    pub score: Option<f64>,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RetrievalResult {
    pub chunks: Vec<RetrievedChunk>,
    /// Formatted context string, when the backend supplies one.
    pub context: Option<String>,
}

impl RetrievalResult {
    /// Context handed to generation: the backend's formatted context if it is
    /// non-blank, else the chunk texts joined by a blank line. `None` when
    /// there is nothing to ground an answer on.
    pub fn usable_context(&self) -> Option<String> {
        if let Some(context) = self.context.as_deref() {
            if !context.trim().is_empty() {
                return Some(context.to_string());
            }
        }
        let joined = self
            .chunks
            .iter()
            .map(|chunk| chunk.text.as_str())
            .filter(|text| !text.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

/// Raw generation output as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAnswer {
    pub answer: String,
    pub model: String,
}

/// A generated answer paired with the question that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub answer: String,
    pub model: String,
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexStats {
    pub total_documents: u64,
    pub model: Option<String>,
    pub index_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendHealth {
    #[default]
    Unknown,
    Reachable(String),
    Unreachable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Timeout, refused connection, undecodable response.
    Network,
    /// Non-2xx response from the backend.
    Server { status: u16 },
}

/// A failed backend call, reduced to what the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub kind: FailureKind,
    pub detail: Option<String>,
}

impl ApiFailure {
    pub fn network() -> Self {
        Self {
            kind: FailureKind::Network,
            detail: None,
        }
    }

    pub fn server(status: u16, detail: Option<String>) -> Self {
        Self {
            kind: FailureKind::Server { status },
            detail,
        }
    }

    /// Server-supplied detail when present, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.detail.as_deref().map(str::trim) {
            Some(detail) if !detail.is_empty() => detail.to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(SelectedFile::from_path("docs/Guide.PDF").is_supported());
        assert!(SelectedFile::from_path("notes.Markdown").is_supported());
        assert!(SelectedFile::from_path(".md").is_supported());
        assert!(!SelectedFile::from_path("README").is_supported());
        assert!(!SelectedFile::from_path("slides.pptx").is_supported());
        assert!(!SelectedFile::from_path("archive.md.zip").is_supported());
    }

    #[test]
    fn backend_context_wins_over_chunk_texts() {
        let result = RetrievalResult {
            chunks: vec![RetrievedChunk {
                text: "A".to_string(),
                score: Some(0.9),
                filename: None,
            }],
            context: Some("<context>\nA\n</context>".to_string()),
        };
        assert_eq!(
            result.usable_context().as_deref(),
            Some("<context>\nA\n</context>")
        );
    }

    #[test]
    fn context_falls_back_to_chunk_texts() {
        let chunk = |text: &str| RetrievedChunk {
            text: text.to_string(),
            score: None,
            filename: None,
        };
        let result = RetrievalResult {
            chunks: vec![chunk("A"), chunk("  "), chunk("B")],
            context: Some("   ".to_string()),
        };
        assert_eq!(result.usable_context().as_deref(), Some("A\n\nB"));
        assert_eq!(RetrievalResult::default().usable_context(), None);
    }

    #[test]
    fn blank_detail_uses_fallback() {
        assert_eq!(ApiFailure::network().user_message("fallback"), "fallback");
        assert_eq!(
            ApiFailure::server(500, Some(" ".into())).user_message("fallback"),
            "fallback"
        );
        assert_eq!(
            ApiFailure::server(404, Some("index empty".into())).user_message("fallback"),
            "index empty"
        );
    }
}
