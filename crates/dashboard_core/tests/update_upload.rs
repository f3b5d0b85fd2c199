use std::sync::Once;

use dashboard_core::{
    update, ApiFailure, AppState, Effect, Msg, SelectedFile, UploadReceipt, UploadStatusKind,
    UNSUPPORTED_FILE_MESSAGE, UPLOAD_FAILED_MESSAGE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

fn select(state: AppState, path: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::FileSelected(SelectedFile::from_path(path)))
}

fn receipt(chunks: u64, filename: &str) -> UploadReceipt {
    UploadReceipt {
        chunks,
        filename: filename.to_string(),
    }
}

#[test]
fn supported_files_upload_once_and_report_success() {
    init_logging();
    for path in ["docs/report.pdf", "notes.md", "README.MARKDOWN"] {
        let (state, effects) = select(AppState::new(), path);
        assert!(effects.is_empty());
        assert!(state.view().can_upload);

        let (state, effects) = update(state, Msg::UploadClicked);
        assert_eq!(
            effects,
            vec![Effect::UploadFile {
                file: SelectedFile::from_path(path),
            }]
        );
        assert!(state.view().is_busy);

        let name = SelectedFile::from_path(path).name;
        let (state, effects) = update(state, Msg::UploadFinished(Ok(receipt(12, &name))));
        assert!(effects.is_empty());
        let view = state.view();
        let status = view.upload_status.expect("status");
        assert_eq!(status.kind, UploadStatusKind::Success);
        assert_eq!(
            status.message,
            format!("Successfully indexed 12 chunks from {name}")
        );
        assert_eq!(view.pending_file, None);
        assert!(!view.can_upload);
        assert!(!view.is_busy);
    }
}

#[test]
fn unsupported_extension_is_rejected_locally() {
    init_logging();
    for path in ["slides.pptx", "README", "image.png.txt"] {
        let (state, effects) = select(AppState::new(), path);
        assert!(effects.is_empty());
        let view = state.view();
        let status = view.upload_status.expect("status");
        assert_eq!(status.kind, UploadStatusKind::Error);
        assert_eq!(status.message, UNSUPPORTED_FILE_MESSAGE);
        assert_eq!(view.pending_file, None);

        let (_state, effects) = update(state, Msg::UploadClicked);
        assert!(effects.is_empty());
    }
}

#[test]
fn new_selection_clears_previous_status() {
    init_logging();
    let (state, _) = select(AppState::new(), "bad.exe");
    assert!(state.view().upload_status.is_some());

    let (state, _) = select(state, "good.md");
    let view = state.view();
    assert_eq!(view.upload_status, None);
    assert_eq!(view.pending_file.as_deref(), Some("good.md"));
}

#[test]
fn upload_without_pending_file_is_noop() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::UploadClicked);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn second_upload_click_while_in_flight_is_ignored() {
    init_logging();
    let (state, _) = select(AppState::new(), "a.pdf");
    let (state, effects) = update(state, Msg::UploadClicked);
    assert_eq!(effects.len(), 1);

    let (state, effects) = update(state, Msg::UploadClicked);
    assert!(effects.is_empty());

    // Selection is locked while the upload runs.
    let (state, _) = select(state, "b.md");
    assert_eq!(state.view().pending_file.as_deref(), Some("a.pdf"));
}

#[test]
fn failed_upload_keeps_file_for_retry() {
    init_logging();
    let (state, _) = select(AppState::new(), "a.pdf");
    let (state, _) = update(state, Msg::UploadClicked);

    let (state, _) = update(
        state,
        Msg::UploadFinished(Err(ApiFailure::server(
            400,
            Some("Unsupported file type: exe".to_string()),
        ))),
    );
    let view = state.view();
    let status = view.upload_status.clone().expect("status");
    assert_eq!(status.kind, UploadStatusKind::Error);
    assert_eq!(status.message, "Unsupported file type: exe");
    assert_eq!(view.pending_file.as_deref(), Some("a.pdf"));
    assert!(view.can_upload);
    // Upload failures never touch the query error banner.
    assert_eq!(view.error_message, None);

    let (state, effects) = update(state, Msg::UploadClicked);
    assert_eq!(effects.len(), 1);

    let (state, _) = update(state, Msg::UploadFinished(Err(ApiFailure::network())));
    assert_eq!(
        state.view().upload_status.unwrap().message,
        UPLOAD_FAILED_MESSAGE
    );
}

#[test]
fn unexpected_upload_completion_is_ignored() {
    init_logging();
    let (mut state, _) = update(
        AppState::new(),
        Msg::UploadFinished(Ok(receipt(3, "ghost.pdf"))),
    );
    assert!(!state.consume_dirty());
    assert_eq!(state.view().upload_status, None);
}
