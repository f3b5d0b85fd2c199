//! Dashboard core: pure state machine and view-model helpers.
mod effect;
mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use model::{
    ApiFailure, BackendHealth, FailureKind, GeneratedAnswer, GenerationResult, IndexStats,
    QueryId, QueryParams, QueryPhase, RetrievalResult, RetrievedChunk, SelectedFile,
    UploadReceipt, UploadStatus, UploadStatusKind, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
    DEFAULT_TOP_K, SUPPORTED_EXTENSIONS,
};
pub use msg::Msg;
pub use state::AppState;
pub use update::{
    update, GENERATION_FAILED_MESSAGE, MODELS_FAILED_MESSAGE, RETRIEVAL_FAILED_MESSAGE,
    UNSUPPORTED_FILE_MESSAGE, UPLOAD_FAILED_MESSAGE,
};
pub use view_model::AppViewModel;
