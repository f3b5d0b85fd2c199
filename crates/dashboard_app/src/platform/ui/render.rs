use chrono::{DateTime, Local};
use dashboard_core::{
    AppViewModel, BackendHealth, GenerationResult, QueryPhase, RetrievalResult, UploadStatusKind,
};

use super::constants::*;

/// Facts the view model does not carry.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub api_url: String,
    /// The API URL came from the built-in fallback rather than configuration.
    pub api_url_degraded: bool,
    pub stats_updated: Option<DateTime<Local>>,
}

/// Full dashboard as terminal lines.
pub fn render(view: &AppViewModel, ctx: &RenderContext) -> Vec<String> {
    let mut lines = Vec::new();
    render_header(&mut lines, view, ctx);
    render_upload(&mut lines, view);
    render_query(&mut lines, view);

    if let Some(message) = &view.error_message {
        lines.push(String::new());
        lines.push(format!("{REQUEST_ERROR}: {message}"));
        lines.push(format!("  Using API endpoint: {}", ctx.api_url));
    }
    if let Some(retrieved) = &view.retrieved_context {
        render_context(&mut lines, retrieved);
    }
    if let Some(answer) = &view.answer {
        render_answer(&mut lines, answer);
    }
    if let Some(models) = &view.models {
        lines.push(String::new());
        lines.push(format!("== {SECTION_MODELS} =="));
        if models.is_empty() {
            lines.push("  (none)".to_string());
        }
        lines.extend(models.iter().map(|model| format!("  - {model}")));
    }
    lines
}

fn render_header(lines: &mut Vec<String>, view: &AppViewModel, ctx: &RenderContext) {
    lines.push(format!("{TITLE} | {SUBTITLE}"));

    let documents = view
        .stats
        .as_ref()
        .map(|stats| format_with_commas(stats.total_documents))
        .unwrap_or_else(|| "-".to_string());
    let mut status = format!("Indexed Documents: {documents}");
    if let Some(model) = view.stats.as_ref().and_then(|stats| stats.model.as_deref()) {
        status.push_str(&format!(" | Model: {model}"));
    }
    if let Some(updated) = ctx.stats_updated {
        status.push_str(&format!(" | Updated {}", updated.format("%H:%M:%S")));
    }
    lines.push(status);

    if let Some(path) = view
        .stats
        .as_ref()
        .and_then(|stats| stats.index_path.as_deref())
    {
        lines.push(format!("Index: {path}"));
    }

    let marker = if ctx.api_url_degraded {
        " (fallback)"
    } else {
        ""
    };
    lines.push(format!(
        "API: {}{marker} | Backend: {}",
        ctx.api_url,
        health_label(&view.backend_health)
    ));
}

fn render_upload(lines: &mut Vec<String>, view: &AppViewModel) {
    lines.push(String::new());
    lines.push(format!("== {SECTION_UPLOAD} =="));
    lines.push(format!(
        "  File: {}",
        view.pending_file.as_deref().unwrap_or(NO_FILE_SELECTED)
    ));
    let button = if view.upload_in_flight {
        BUTTON_UPLOADING
    } else {
        BUTTON_UPLOAD
    };
    lines.push(format!("  [{button}]{}", enabled_suffix(view.can_upload)));
    if let Some(status) = &view.upload_status {
        let tag = match status.kind {
            UploadStatusKind::Success => "OK",
            UploadStatusKind::Error => "ERR",
        };
        lines.push(format!("  {tag}: {}", status.message));
    }
}

fn render_query(lines: &mut Vec<String>, view: &AppViewModel) {
    lines.push(String::new());
    lines.push(format!("== {SECTION_QUERY} =="));
    if view.query.is_empty() {
        lines.push(format!("  > {QUERY_PLACEHOLDER}"));
    } else {
        lines.push(format!("  > {}", view.query));
    }
    let button = if view.query_in_flight {
        BUTTON_PROCESSING
    } else {
        BUTTON_ASK
    };
    lines.push(format!(
        "  [{button}]{} {}",
        enabled_suffix(view.can_submit),
        phase_label(view.phase)
    ));
}

fn render_context(lines: &mut Vec<String>, retrieved: &RetrievalResult) {
    lines.push(String::new());
    lines.push(format!("== {SECTION_CONTEXT} =="));
    if retrieved.chunks.is_empty() {
        lines.push(format!("  {NO_CHUNKS}"));
        return;
    }
    for (index, chunk) in retrieved.chunks.iter().enumerate() {
        let score = chunk
            .score
            .map(|score| format!("{score:.3}"))
            .unwrap_or_else(|| "N/A".to_string());
        lines.push(format!(
            "  Chunk {} | Score: {score} | Source: {}",
            index + 1,
            chunk.filename.as_deref().unwrap_or(UNKNOWN_SOURCE)
        ));
        lines.extend(chunk.text.lines().map(|line| format!("    {line}")));
    }
}

fn render_answer(lines: &mut Vec<String>, answer: &GenerationResult) {
    lines.push(String::new());
    lines.push(format!("== {SECTION_ANSWER} =="));
    lines.push(format!("  Q: {}", answer.question));
    lines.extend(answer.answer.lines().map(|line| format!("  {line}")));
    lines.push(format!("  Model: {}", answer.model));
}

fn enabled_suffix(enabled: bool) -> &'static str {
    if enabled {
        ""
    } else {
        " (disabled)"
    }
}

fn phase_label(phase: QueryPhase) -> &'static str {
    match phase {
        QueryPhase::Idle => "",
        QueryPhase::Retrieving => "retrieving context",
        QueryPhase::Generating => "generating answer",
        QueryPhase::Done => "done",
        QueryPhase::Failed => "failed",
    }
}

fn health_label(health: &BackendHealth) -> String {
    match health {
        BackendHealth::Unknown => "checking".to_string(),
        BackendHealth::Reachable(status) => status.clone(),
        BackendHealth::Unreachable(reason) => format!("unreachable ({reason})"),
    }
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{IndexStats, RetrievedChunk, UploadStatus};

    fn ctx() -> RenderContext {
        RenderContext {
            api_url: "http://localhost:8000/".to_string(),
            api_url_degraded: false,
            stats_updated: None,
        }
    }

    fn contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|line| line.contains(needle))
    }

    #[test]
    fn idle_dashboard_shows_placeholders() {
        let view = AppViewModel::default();
        let lines = render(&view, &ctx());
        assert!(contains(&lines, "Indexed Documents: -"));
        assert!(contains(&lines, NO_FILE_SELECTED));
        assert!(contains(&lines, QUERY_PLACEHOLDER));
        assert!(contains(&lines, "Backend: checking"));
        assert!(!contains(&lines, REQUEST_ERROR));
    }

    #[test]
    fn busy_labels_replace_buttons() {
        let view = AppViewModel {
            query_in_flight: true,
            upload_in_flight: true,
            phase: QueryPhase::Retrieving,
            ..AppViewModel::default()
        };
        let lines = render(&view, &ctx());
        assert!(contains(&lines, "[Processing...] (disabled) retrieving context"));
        assert!(contains(&lines, "[Uploading...] (disabled)"));
    }

    #[test]
    fn chunks_show_score_and_source() {
        let view = AppViewModel {
            retrieved_context: Some(RetrievalResult {
                chunks: vec![
                    RetrievedChunk {
                        text: "A".to_string(),
                        score: Some(0.91234),
                        filename: Some("a.pdf".to_string()),
                    },
                    RetrievedChunk {
                        text: "B".to_string(),
                        score: None,
                        filename: None,
                    },
                ],
                context: None,
            }),
            ..AppViewModel::default()
        };
        let lines = render(&view, &ctx());
        assert!(contains(&lines, "Chunk 1 | Score: 0.912 | Source: a.pdf"));
        assert!(contains(&lines, "Chunk 2 | Score: N/A | Source: Unknown"));
    }

    #[test]
    fn empty_retrieval_says_so() {
        let view = AppViewModel {
            retrieved_context: Some(RetrievalResult::default()),
            ..AppViewModel::default()
        };
        assert!(contains(&render(&view, &ctx()), NO_CHUNKS));
    }

    #[test]
    fn error_banner_names_the_endpoint() {
        let view = AppViewModel {
            error_message: Some("index empty".to_string()),
            ..AppViewModel::default()
        };
        let lines = render(&view, &ctx());
        assert!(contains(&lines, "Request error: index empty"));
        assert!(contains(&lines, "Using API endpoint: http://localhost:8000/"));
    }

    #[test]
    fn header_carries_stats_and_fallback_marker() {
        let view = AppViewModel {
            stats: Some(IndexStats {
                total_documents: 1234567,
                model: Some("titan-embed".to_string()),
                index_path: Some("/data/index".to_string()),
            }),
            backend_health: BackendHealth::Reachable("healthy".to_string()),
            upload_status: Some(UploadStatus::success("Successfully indexed 3 chunks from a.md")),
            ..AppViewModel::default()
        };
        let context = RenderContext {
            api_url_degraded: true,
            ..ctx()
        };
        let lines = render(&view, &context);
        assert!(contains(&lines, "Indexed Documents: 1,234,567 | Model: titan-embed"));
        assert!(contains(&lines, "Index: /data/index"));
        assert!(contains(&lines, "(fallback) | Backend: healthy"));
        assert!(contains(&lines, "OK: Successfully indexed 3 chunks from a.md"));
    }

    #[test]
    fn answer_shows_question_and_model() {
        let view = AppViewModel {
            answer: Some(GenerationResult {
                answer: "X is A".to_string(),
                model: "gpt-test".to_string(),
                question: "What is X?".to_string(),
            }),
            ..AppViewModel::default()
        };
        let lines = render(&view, &ctx());
        assert!(contains(&lines, "Q: What is X?"));
        assert!(contains(&lines, "  X is A"));
        assert!(contains(&lines, "Model: gpt-test"));
    }
}
