use crate::view_model::AppViewModel;
use crate::{
    BackendHealth, GenerationResult, IndexStats, QueryId, QueryParams, QueryPhase,
    RetrievalResult, SelectedFile, UploadStatus,
};

/// The query currently owning the retrieve-then-generate chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LiveQuery {
    pub(crate) id: QueryId,
    /// Question text captured at submission; later edits do not reach it.
    pub(crate) question: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    query: String,
    params: QueryParams,
    phase: QueryPhase,
    last_query_id: QueryId,
    live_query: Option<LiveQuery>,
    retrieved: Option<RetrievalResult>,
    answer: Option<GenerationResult>,
    error_message: Option<String>,
    pending_file: Option<SelectedFile>,
    upload_in_flight: bool,
    upload_status: Option<UploadStatus>,
    stats: Option<IndexStats>,
    models: Option<Vec<String>>,
    models_in_flight: bool,
    health: BackendHealth,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: QueryParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let query_in_flight = self.phase.is_in_flight();
        AppViewModel {
            query: self.query.clone(),
            phase: self.phase,
            retrieved_context: self.retrieved.clone(),
            answer: self.answer.clone(),
            error_message: self.error_message.clone(),
            upload_status: self.upload_status.clone(),
            pending_file: self.pending_file.as_ref().map(|file| file.name.clone()),
            stats: self.stats.clone(),
            models: self.models.clone(),
            backend_health: self.health.clone(),
            is_busy: query_in_flight || self.upload_in_flight,
            query_in_flight,
            upload_in_flight: self.upload_in_flight,
            can_submit: !query_in_flight && !self.query.trim().is_empty(),
            can_upload: !self.upload_in_flight && self.pending_file.is_some(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn phase(&self) -> QueryPhase {
        self.phase
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn set_query(&mut self, query: String) {
        if self.query != query {
            self.query = query;
            self.mark_dirty();
        }
    }

    /// Stamps a new query id and captures the current query text for it.
    pub(crate) fn begin_query(&mut self) -> LiveQuery {
        self.last_query_id += 1;
        let live = LiveQuery {
            id: self.last_query_id,
            question: self.query.clone(),
        };
        self.live_query = Some(live.clone());
        self.phase = QueryPhase::Retrieving;
        self.mark_dirty();
        live
    }

    /// The live query, if `query_id` owns it and the chain is in `phase`.
    pub(crate) fn live_query_in(&self, query_id: QueryId, phase: QueryPhase) -> Option<&LiveQuery> {
        self.live_query
            .as_ref()
            .filter(|live| live.id == query_id && self.phase == phase)
    }

    pub(crate) fn apply_retrieval(&mut self, result: RetrievalResult) -> Option<String> {
        let context = result.usable_context();
        self.retrieved = Some(result);
        // The previous answer belongs to a different query.
        self.answer = None;
        self.error_message = None;
        if context.is_some() {
            self.phase = QueryPhase::Generating;
        } else {
            self.finish_query(QueryPhase::Done);
        }
        self.mark_dirty();
        context
    }

    pub(crate) fn apply_answer(&mut self, answer: GenerationResult) {
        self.answer = Some(answer);
        self.error_message = None;
        self.finish_query(QueryPhase::Done);
        self.mark_dirty();
    }

    pub(crate) fn fail_query(&mut self, message: String) {
        self.error_message = Some(message);
        self.finish_query(QueryPhase::Failed);
        self.mark_dirty();
    }

    fn finish_query(&mut self, phase: QueryPhase) {
        self.phase = phase;
        self.live_query = None;
    }

    pub(crate) fn upload_in_flight(&self) -> bool {
        self.upload_in_flight
    }

    pub(crate) fn select_file(&mut self, file: SelectedFile) {
        self.pending_file = Some(file);
        self.upload_status = None;
        self.mark_dirty();
    }

    pub(crate) fn set_upload_status(&mut self, status: UploadStatus) {
        self.upload_status = Some(status);
        self.mark_dirty();
    }

    pub(crate) fn begin_upload(&mut self) -> Option<SelectedFile> {
        if self.upload_in_flight {
            return None;
        }
        let file = self.pending_file.clone()?;
        self.upload_in_flight = true;
        self.mark_dirty();
        Some(file)
    }

    pub(crate) fn finish_upload(&mut self, status: UploadStatus, clear_pending: bool) {
        self.upload_in_flight = false;
        if clear_pending {
            self.pending_file = None;
        }
        self.set_upload_status(status);
    }

    pub(crate) fn set_stats(&mut self, stats: IndexStats) {
        if self.stats.as_ref() != Some(&stats) {
            self.stats = Some(stats);
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_models_request(&mut self) -> bool {
        if self.models_in_flight {
            return false;
        }
        self.models_in_flight = true;
        true
    }

    pub(crate) fn finish_models_request(&mut self) -> bool {
        std::mem::take(&mut self.models_in_flight)
    }

    pub(crate) fn set_models(&mut self, models: Vec<String>) {
        self.models = Some(models);
        self.mark_dirty();
    }

    pub(crate) fn set_error_message(&mut self, message: String) {
        self.error_message = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn set_health(&mut self, health: BackendHealth) {
        if self.health != health {
            self.health = health;
            self.mark_dirty();
        }
    }
}
