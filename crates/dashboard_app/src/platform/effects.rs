use std::sync::{mpsc, Arc};
use std::time::Duration;

use dashboard_core::{
    ApiFailure, Effect, GeneratedAnswer, IndexStats, Msg, RetrievalResult, RetrievedChunk,
    UploadReceipt,
};
use dashboard_engine::{
    ApiError, ApiSettings, EngineError, EngineEvent, EngineHandle, EventSink, FailureKind,
    RetrievalResponse,
};
use dashboard_logging::{rag_debug, rag_info, rag_warn};

use super::app::AppEvent;

/// Forwards engine events into the app inbox as core messages.
struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Msg(map_event(event)));
    }
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: &ApiSettings, tx: mpsc::Sender<AppEvent>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings, Arc::new(MsgSink { tx }))?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::UploadFile { file } => {
                    rag_info!("Upload name={} path={}", file.name, file.path.display());
                    self.engine.upload(file.path, file.name);
                }
                Effect::Retrieve {
                    query_id,
                    question,
                    top_k,
                } => {
                    rag_info!(
                        "Retrieve query_id={} question_len={} top_k={}",
                        query_id,
                        question.len(),
                        top_k
                    );
                    self.engine.retrieve(query_id, question, top_k);
                }
                Effect::Generate {
                    query_id,
                    context,
                    question,
                    max_tokens,
                    temperature,
                } => {
                    rag_info!(
                        "Generate query_id={} context_len={} max_tokens={}",
                        query_id,
                        context.len(),
                        max_tokens
                    );
                    self.engine
                        .generate(query_id, context, question, max_tokens, temperature);
                }
                Effect::ListModels => self.engine.list_models(),
            }
        }
    }

    pub fn check_health(&self) {
        self.engine.check_health();
    }

    /// Starts polling, replacing any poller already running.
    pub fn start_stats_polling(&self, interval: Duration) {
        rag_debug!("Stats polling every {:?}", interval);
        self.engine.start_stats_polling(interval);
    }

    pub fn shutdown(self) {
        self.engine.stop_stats_polling();
        self.engine.shutdown();
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadCompleted(result) => Msg::UploadFinished(
            result
                .map(|response| UploadReceipt {
                    chunks: response.chunks,
                    filename: response.filename,
                })
                .map_err(|err| map_failure("upload", err)),
        ),
        EngineEvent::RetrievalCompleted { query_id, result } => Msg::RetrievalFinished {
            query_id,
            result: result
                .map(map_retrieval)
                .map_err(|err| map_failure("retrieval", err)),
        },
        EngineEvent::GenerationCompleted { query_id, result } => Msg::GenerationFinished {
            query_id,
            result: result
                .map(|response| GeneratedAnswer {
                    answer: response.answer,
                    model: response.model,
                })
                .map_err(|err| map_failure("generation", err)),
        },
        EngineEvent::StatsFetched(result) => Msg::StatsRefreshed(
            result
                .map(|stats| IndexStats {
                    total_documents: stats.total_documents,
                    model: stats.model,
                    index_path: stats.index_path,
                })
                .map_err(|err| map_failure("stats", err)),
        ),
        EngineEvent::ModelsListed(result) => {
            Msg::ModelsListed(result.map_err(|err| map_failure("models", err)))
        }
        EngineEvent::HealthChecked(result) => Msg::HealthChecked(
            result
                .map(|health| health.status)
                .map_err(|err| map_failure("health", err)),
        ),
    }
}

fn map_retrieval(response: RetrievalResponse) -> RetrievalResult {
    RetrievalResult {
        chunks: response
            .chunks
            .into_iter()
            .map(|chunk| RetrievedChunk {
                text: chunk.text,
                score: chunk.score,
                filename: chunk.metadata.and_then(|metadata| metadata.filename),
            })
            .collect(),
        context: response.context,
    }
}

fn map_failure(operation: &str, err: ApiError) -> ApiFailure {
    rag_warn!("{} failed: {}", operation, err);
    match err.kind {
        FailureKind::HttpStatus(status) => ApiFailure::server(status, err.detail),
        // A local read failure carries its own explanation.
        FailureKind::Io => ApiFailure {
            kind: dashboard_core::FailureKind::Network,
            detail: Some(err.message),
        },
        _ => ApiFailure::network(),
    }
}
