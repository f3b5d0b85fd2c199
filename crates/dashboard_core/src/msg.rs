use crate::{
    ApiFailure, GeneratedAnswer, IndexStats, QueryId, RetrievalResult, SelectedFile, UploadReceipt,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the query box.
    QueryChanged(String),
    /// User submitted the current query text.
    QuerySubmitted,
    /// User picked a file for upload.
    FileSelected(SelectedFile),
    /// User clicked Upload.
    UploadClicked,
    /// User asked for the list of generation models.
    ModelsRequested,
    /// Ingestion endpoint answered.
    UploadFinished(Result<UploadReceipt, ApiFailure>),
    /// Retrieval step of query `query_id` completed.
    RetrievalFinished {
        query_id: QueryId,
        result: Result<RetrievalResult, ApiFailure>,
    },
    /// Generation step of query `query_id` completed.
    GenerationFinished {
        query_id: QueryId,
        result: Result<GeneratedAnswer, ApiFailure>,
    },
    /// Stats poller tick completed.
    StatsRefreshed(Result<IndexStats, ApiFailure>),
    ModelsListed(Result<Vec<String>, ApiFailure>),
    HealthChecked(Result<String, ApiFailure>),
}
