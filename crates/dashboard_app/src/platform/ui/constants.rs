pub const TITLE: &str = "RAG Dashboard";
pub const SUBTITLE: &str = "Upload documents, then ask questions grounded in them";

pub const SECTION_UPLOAD: &str = "Upload Document";
pub const SECTION_QUERY: &str = "Ask a Question";
pub const SECTION_CONTEXT: &str = "Retrieved Context";
pub const SECTION_ANSWER: &str = "LLM Response";
pub const SECTION_MODELS: &str = "Available Models";

pub const BUTTON_UPLOAD: &str = "Upload";
pub const BUTTON_UPLOADING: &str = "Uploading...";
pub const BUTTON_ASK: &str = "Ask";
pub const BUTTON_PROCESSING: &str = "Processing...";

pub const QUERY_PLACEHOLDER: &str = "Ask a question about your documents...";
pub const NO_FILE_SELECTED: &str = "No file selected";
pub const NO_CHUNKS: &str = "No chunks retrieved";
pub const UNKNOWN_SOURCE: &str = "Unknown";
pub const REQUEST_ERROR: &str = "Request error";

pub const QUERY_BUSY_NOTICE: &str =
    "A question is still being answered; the new one was not sent.";
pub const UPLOAD_BUSY_NOTICE: &str = "An upload is already in progress.";
