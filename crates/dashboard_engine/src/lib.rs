//! Dashboard engine: backend transport and effect execution.
mod client;
mod config;
mod engine;
mod poller;
mod types;

pub use client::{
    RagApi, ReqwestApiClient, GENERATION_PATH, HEALTH_PATH, MODELS_PATH, RETRIEVAL_PATH,
    STATS_PATH, UPLOAD_PATH,
};
pub use config::{
    parse_base_url, resolve_base_url, ApiSettings, BaseUrlError, BaseUrlSource, BaseUrlSources,
    ResolvedBaseUrl, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, FALLBACK_BASE_URL,
};
pub use engine::{ChannelEventSink, EngineError, EngineHandle, EventSink};
pub use poller::{StatsPoller, DEFAULT_STATS_INTERVAL};
pub use types::{
    ApiError, ChunkMetadata, ChunkPayload, EngineEvent, FailureKind, GenerationRequest,
    GenerationResponse, HealthResponse, QueryId, RetrievalRequest, RetrievalResponse,
    StatsResponse, UploadResponse,
};
