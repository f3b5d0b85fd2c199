use crate::{QueryId, SelectedFile};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    UploadFile {
        file: SelectedFile,
    },
    Retrieve {
        query_id: QueryId,
        question: String,
        top_k: u32,
    },
    Generate {
        query_id: QueryId,
        context: String,
        question: String,
        max_tokens: u32,
        temperature: f32,
    },
    ListModels,
}
