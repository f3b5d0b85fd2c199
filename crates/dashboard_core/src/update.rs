use crate::{AppState, BackendHealth, Effect, GenerationResult, Msg, QueryPhase, UploadStatus};

pub const UNSUPPORTED_FILE_MESSAGE: &str = "Only PDF and Markdown files are supported";
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed";
pub const RETRIEVAL_FAILED_MESSAGE: &str = "Failed to retrieve context from the API.";
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate an answer.";
pub const MODELS_FAILED_MESSAGE: &str = "Failed to list models.";
const HEALTH_FAILED_MESSAGE: &str = "unreachable";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryChanged(text) => {
            state.set_query(text);
            Vec::new()
        }
        Msg::QuerySubmitted => {
            // Overlapping submissions are refused; the submit control is
            // disabled while a chain is in flight.
            if state.query().trim().is_empty() || state.phase().is_in_flight() {
                return (state, Vec::new());
            }
            let live = state.begin_query();
            vec![Effect::Retrieve {
                query_id: live.id,
                question: live.question,
                top_k: state.params().top_k,
            }]
        }
        Msg::RetrievalFinished { query_id, result } => {
            let Some(live) = state.live_query_in(query_id, QueryPhase::Retrieving).cloned() else {
                return (state, Vec::new());
            };
            match result {
                Ok(retrieved) => match state.apply_retrieval(retrieved) {
                    Some(context) => vec![Effect::Generate {
                        query_id,
                        context,
                        question: live.question,
                        max_tokens: state.params().max_tokens,
                        temperature: state.params().temperature,
                    }],
                    None => Vec::new(),
                },
                Err(failure) => {
                    state.fail_query(failure.user_message(RETRIEVAL_FAILED_MESSAGE));
                    Vec::new()
                }
            }
        }
        Msg::GenerationFinished { query_id, result } => {
            let Some(live) = state.live_query_in(query_id, QueryPhase::Generating).cloned() else {
                return (state, Vec::new());
            };
            match result {
                Ok(generated) => state.apply_answer(GenerationResult {
                    answer: generated.answer,
                    model: generated.model,
                    question: live.question,
                }),
                Err(failure) => state.fail_query(failure.user_message(GENERATION_FAILED_MESSAGE)),
            }
            Vec::new()
        }
        Msg::FileSelected(file) => {
            if state.upload_in_flight() {
                return (state, Vec::new());
            }
            if file.is_supported() {
                state.select_file(file);
            } else {
                state.set_upload_status(UploadStatus::error(UNSUPPORTED_FILE_MESSAGE));
            }
            Vec::new()
        }
        Msg::UploadClicked => match state.begin_upload() {
            Some(file) => vec![Effect::UploadFile { file }],
            None => Vec::new(),
        },
        Msg::UploadFinished(result) => {
            if !state.upload_in_flight() {
                return (state, Vec::new());
            }
            match result {
                Ok(receipt) => state.finish_upload(
                    UploadStatus::success(format!(
                        "Successfully indexed {} chunks from {}",
                        receipt.chunks, receipt.filename
                    )),
                    true,
                ),
                // The pending file stays selected so the upload can be retried.
                Err(failure) => state.finish_upload(
                    UploadStatus::error(failure.user_message(UPLOAD_FAILED_MESSAGE)),
                    false,
                ),
            }
            Vec::new()
        }
        Msg::StatsRefreshed(result) => {
            // Best effort: failures leave the last known stats in place.
            if let Ok(stats) = result {
                state.set_stats(stats);
            }
            Vec::new()
        }
        Msg::ModelsRequested => {
            if state.begin_models_request() {
                vec![Effect::ListModels]
            } else {
                Vec::new()
            }
        }
        Msg::ModelsListed(result) => {
            if !state.finish_models_request() {
                return (state, Vec::new());
            }
            match result {
                Ok(models) => state.set_models(models),
                Err(failure) => {
                    state.set_error_message(failure.user_message(MODELS_FAILED_MESSAGE))
                }
            }
            Vec::new()
        }
        Msg::HealthChecked(result) => {
            state.set_health(match result {
                Ok(status) => BackendHealth::Reachable(status),
                Err(failure) => {
                    BackendHealth::Unreachable(failure.user_message(HEALTH_FAILED_MESSAGE))
                }
            });
            Vec::new()
        }
    };

    (state, effects)
}
