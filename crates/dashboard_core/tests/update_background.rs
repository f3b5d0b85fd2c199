use dashboard_core::{
    update, ApiFailure, AppState, BackendHealth, Effect, IndexStats, Msg, MODELS_FAILED_MESSAGE,
};

fn stats(total_documents: u64) -> IndexStats {
    IndexStats {
        total_documents,
        ..IndexStats::default()
    }
}

#[test]
fn stats_failure_is_silent_and_later_success_lands() {
    let (mut state, effects) = update(
        AppState::new(),
        Msg::StatsRefreshed(Err(ApiFailure::server(500, Some("boom".to_string())))),
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    let view = state.view();
    assert_eq!(view.error_message, None);
    assert_eq!(view.stats, None);

    let (mut state, _) = update(state, Msg::StatsRefreshed(Ok(stats(7))));
    assert!(state.consume_dirty());
    assert_eq!(state.view().stats, Some(stats(7)));
    assert_eq!(state.view().error_message, None);
}

#[test]
fn stale_stats_survive_failures() {
    let (state, _) = update(AppState::new(), Msg::StatsRefreshed(Ok(stats(3))));
    let (state, _) = update(state, Msg::StatsRefreshed(Err(ApiFailure::network())));
    assert_eq!(state.view().stats, Some(stats(3)));
}

#[test]
fn identical_stats_do_not_trigger_render() {
    let (mut state, _) = update(AppState::new(), Msg::StatsRefreshed(Ok(stats(3))));
    assert!(state.consume_dirty());
    let (mut state, _) = update(state, Msg::StatsRefreshed(Ok(stats(3))));
    assert!(!state.consume_dirty());
}

#[test]
fn stats_do_not_touch_query_error() {
    let (state, _) = update(AppState::new(), Msg::QueryChanged("q".to_string()));
    let (state, _) = update(state, Msg::QuerySubmitted);
    let (state, _) = update(
        state,
        Msg::RetrievalFinished {
            query_id: 1,
            result: Err(ApiFailure::server(500, Some("index empty".to_string()))),
        },
    );
    let (state, _) = update(state, Msg::StatsRefreshed(Ok(stats(1))));
    assert_eq!(state.view().error_message.as_deref(), Some("index empty"));
}

#[test]
fn models_request_is_deduplicated() {
    let (state, effects) = update(AppState::new(), Msg::ModelsRequested);
    assert_eq!(effects, vec![Effect::ListModels]);
    let (state, effects) = update(state, Msg::ModelsRequested);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::ModelsListed(Ok(vec!["anthropic.claude-v2".to_string()])),
    );
    assert_eq!(
        state.view().models,
        Some(vec!["anthropic.claude-v2".to_string()])
    );

    let (_state, effects) = update(state, Msg::ModelsRequested);
    assert_eq!(effects, vec![Effect::ListModels]);
}

#[test]
fn models_failure_reports_fallback() {
    let (state, _) = update(AppState::new(), Msg::ModelsRequested);
    let (state, _) = update(state, Msg::ModelsListed(Err(ApiFailure::network())));
    assert_eq!(
        state.view().error_message.as_deref(),
        Some(MODELS_FAILED_MESSAGE)
    );
}

#[test]
fn health_result_is_shown_without_error_banner() {
    let (state, _) = update(AppState::new(), Msg::HealthChecked(Ok("healthy".to_string())));
    assert_eq!(
        state.view().backend_health,
        BackendHealth::Reachable("healthy".to_string())
    );

    let (state, _) = update(state, Msg::HealthChecked(Err(ApiFailure::network())));
    let view = state.view();
    assert!(matches!(view.backend_health, BackendHealth::Unreachable(_)));
    assert_eq!(view.error_message, None);
}
