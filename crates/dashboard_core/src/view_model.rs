use crate::{BackendHealth, GenerationResult, IndexStats, QueryPhase, RetrievalResult, UploadStatus};

/// Render-ready snapshot of everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub query: String,
    pub phase: QueryPhase,
    pub retrieved_context: Option<RetrievalResult>,
    pub answer: Option<GenerationResult>,
    pub error_message: Option<String>,
    pub upload_status: Option<UploadStatus>,
    /// Name of the file waiting to be uploaded.
    pub pending_file: Option<String>,
    pub stats: Option<IndexStats>,
    pub models: Option<Vec<String>>,
    pub backend_health: BackendHealth,
    /// A query chain or an upload is in flight.
    pub is_busy: bool,
    pub query_in_flight: bool,
    pub upload_in_flight: bool,
    pub can_submit: bool,
    pub can_upload: bool,
    pub dirty: bool,
}
