use std::fmt;

use serde::{Deserialize, Serialize};

/// Correlates retrieval and generation completions with the submission that issued them.
pub type QueryId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    pub chunks: u64,
    pub filename: String,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub total_chars: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub total_documents: u64,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub index_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievalRequest {
    pub question: String,
    pub top_k: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RetrievalResponse {
    #[serde(default)]
    pub chunks: Vec<ChunkPayload>,
    /// Chunk texts pre-formatted by the backend for generation.
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChunkPayload {
    pub text: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub metadata: Option<ChunkMetadata>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub context: String,
    pub question: String,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerationResponse {
    pub answer: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    UploadCompleted(Result<UploadResponse, ApiError>),
    RetrievalCompleted {
        query_id: QueryId,
        result: Result<RetrievalResponse, ApiError>,
    },
    GenerationCompleted {
        query_id: QueryId,
        result: Result<GenerationResponse, ApiError>,
    },
    StatsFetched(Result<StatsResponse, ApiError>),
    ModelsListed(Result<Vec<String>, ApiError>),
    HealthChecked(Result<HealthResponse, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
    /// `detail` field of a non-2xx JSON body.
    pub detail: Option<String>,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind {
            FailureKind::HttpStatus(code) => Some(code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Io,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "invalid response body"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
