use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use dashboard_logging::{rag_debug, rag_info};

use crate::client::{RagApi, ReqwestApiClient};
use crate::config::ApiSettings;
use crate::poller::StatsPoller;
use crate::{ApiError, EngineEvent, GenerationRequest, QueryId, RetrievalRequest};

/// Receives engine events on the engine's runtime threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        // The receiver is gone once the owner shut down; late results are dropped.
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Client(#[from] ApiError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Upload { path: PathBuf, filename: String },
    Retrieve {
        query_id: QueryId,
        request: RetrievalRequest,
    },
    Generate {
        query_id: QueryId,
        request: GenerationRequest,
    },
    ListModels,
    CheckHealth,
    StartStatsPolling { interval: Duration },
    StopStatsPolling,
}

/// Runs backend calls on a background tokio runtime and reports completions
/// through an [`EventSink`]. Calls are fire-and-forget and never block the caller.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::Sender<EngineCommand>>,
    worker: Option<thread::JoinHandle<()>>,
    model_id: Option<String>,
}

impl EngineHandle {
    pub fn new(settings: &ApiSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let api = Arc::new(ReqwestApiClient::new(settings)?);
        let mut handle = Self::with_api(api, sink)?;
        handle.model_id = settings.model_id.clone();
        Ok(handle)
    }

    /// Engine whose events land on the returned channel.
    pub fn with_channel(
        api: Arc<dyn RagApi>,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let (event_tx, event_rx) = mpsc::channel();
        let handle = Self::with_api(api, Arc::new(ChannelEventSink::new(event_tx)))?;
        Ok((handle, event_rx))
    }

    pub fn with_api(api: Arc<dyn RagApi>, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("rag-engine")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            let mut poller: Option<StatsPoller> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartStatsPolling { interval } => {
                        // Replacing the poller drops, and so cancels, the old one.
                        poller = Some(StatsPoller::spawn(
                            runtime.handle(),
                            api.clone(),
                            interval,
                            sink.clone(),
                        ));
                    }
                    EngineCommand::StopStatsPolling => {
                        poller = None;
                    }
                    command => {
                        let api = api.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            handle_command(api.as_ref(), command, sink.as_ref()).await;
                        });
                    }
                }
            }
            drop(poller);
            rag_info!("Engine worker stopped");
        });

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            worker: Some(worker),
            model_id: None,
        })
    }

    pub fn upload(&self, path: impl Into<PathBuf>, filename: impl Into<String>) {
        self.send(EngineCommand::Upload {
            path: path.into(),
            filename: filename.into(),
        });
    }

    pub fn retrieve(&self, query_id: QueryId, question: String, top_k: u32) {
        self.send(EngineCommand::Retrieve {
            query_id,
            request: RetrievalRequest { question, top_k },
        });
    }

    pub fn generate(
        &self,
        query_id: QueryId,
        context: String,
        question: String,
        max_tokens: u32,
        temperature: f32,
    ) {
        self.send(EngineCommand::Generate {
            query_id,
            request: GenerationRequest {
                context,
                question,
                max_tokens,
                temperature,
                model_id: self.model_id.clone(),
            },
        });
    }

    pub fn list_models(&self) {
        self.send(EngineCommand::ListModels);
    }

    pub fn check_health(&self) {
        self.send(EngineCommand::CheckHealth);
    }

    pub fn start_stats_polling(&self, interval: Duration) {
        self.send(EngineCommand::StartStatsPolling { interval });
    }

    pub fn stop_stats_polling(&self) {
        self.send(EngineCommand::StopStatsPolling);
    }

    /// Stop accepting commands, cancel the poller and wait for the worker.
    /// Requests still in flight are abandoned.
    pub fn shutdown(mut self) {
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    fn send(&self, command: EngineCommand) {
        if let Some(tx) = &self.cmd_tx {
            let _ = tx.send(command);
        }
    }
}

async fn handle_command(api: &dyn RagApi, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::Upload { path, filename } => {
            rag_debug!("Uploading {}", path.display());
            let result = api.upload_document(&path, &filename).await;
            sink.emit(EngineEvent::UploadCompleted(result));
        }
        EngineCommand::Retrieve { query_id, request } => {
            let result = api.retrieve(&request).await;
            sink.emit(EngineEvent::RetrievalCompleted { query_id, result });
        }
        EngineCommand::Generate { query_id, request } => {
            let result = api.generate(&request).await;
            sink.emit(EngineEvent::GenerationCompleted { query_id, result });
        }
        EngineCommand::ListModels => {
            let result = api.list_models().await;
            sink.emit(EngineEvent::ModelsListed(result));
        }
        EngineCommand::CheckHealth => {
            let result = api.health().await;
            sink.emit(EngineEvent::HealthChecked(result));
        }
        // Handled on the worker thread.
        EngineCommand::StartStatsPolling { .. } | EngineCommand::StopStatsPolling => {}
    }
}
