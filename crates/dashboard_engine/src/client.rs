use std::path::Path;

use dashboard_logging::{rag_debug, rag_warn};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ApiSettings;
use crate::types::ModelsResponse;
use crate::{
    ApiError, FailureKind, GenerationRequest, GenerationResponse, HealthResponse,
    RetrievalRequest, RetrievalResponse, StatsResponse, UploadResponse,
};

pub const UPLOAD_PATH: &str = "api/v1/ingestion/upload";
pub const STATS_PATH: &str = "api/v1/ingestion/stats";
pub const RETRIEVAL_PATH: &str = "api/v1/retrieval/query";
pub const GENERATION_PATH: &str = "api/v1/generation/generate";
pub const MODELS_PATH: &str = "api/v1/generation/models";
pub const HEALTH_PATH: &str = "health";

/// The backend endpoints the dashboard consumes.
#[async_trait::async_trait]
pub trait RagApi: Send + Sync {
    async fn upload_document(&self, path: &Path, filename: &str)
        -> Result<UploadResponse, ApiError>;

    async fn index_stats(&self) -> Result<StatsResponse, ApiError>;

    async fn retrieve(&self, request: &RetrievalRequest) -> Result<RetrievalResponse, ApiError>;

    async fn generate(&self, request: &GenerationRequest)
        -> Result<GenerationResponse, ApiError>;

    async fn list_models(&self) -> Result<Vec<String>, ApiError>;

    async fn health(&self) -> Result<HealthResponse, ApiError>;
}

/// Stateless JSON-over-HTTP client bound to one base URL. No retries.
#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            base_url: settings.base_url.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue `method path` with an optional JSON body and return the decoded JSON reply.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        self.call(method, path, body).await
    }

    /// [`Self::request`] with typed body and reply. Every JSON endpoint goes through here.
    async fn call<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let mut builder = self.client.request(method.clone(), self.endpoint(path)?);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(method, path, builder).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        rag_debug!("{} {}", method, path);
        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            rag_warn!(
                "{} {} failed with {} (detail: {:?})",
                method,
                path,
                status,
                detail
            );
            return Err(
                ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
                    .with_detail(detail),
            );
        }

        response.json::<T>().await.map_err(map_reqwest_error)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call::<(), T>(Method::GET, path, None).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        self.call(Method::POST, path, Some(body)).await
    }
}

#[async_trait::async_trait]
impl RagApi for ReqwestApiClient {
    async fn upload_document(
        &self,
        path: &Path,
        filename: &str,
    ) -> Result<UploadResponse, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            ApiError::new(
                FailureKind::Io,
                format!("could not read {}: {err}", path.display()),
            )
        })?;
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime_for(filename))
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        let form = Form::new().part("file", part);

        let builder = self.client.post(self.endpoint(UPLOAD_PATH)?).multipart(form);
        self.send(Method::POST, UPLOAD_PATH, builder).await
    }

    async fn index_stats(&self) -> Result<StatsResponse, ApiError> {
        self.get_json(STATS_PATH).await
    }

    async fn retrieve(&self, request: &RetrievalRequest) -> Result<RetrievalResponse, ApiError> {
        self.post_json(RETRIEVAL_PATH, request).await
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ApiError> {
        self.post_json(GENERATION_PATH, request).await
    }

    async fn list_models(&self) -> Result<Vec<String>, ApiError> {
        let response: ModelsResponse = self.get_json(MODELS_PATH).await?;
        Ok(response.models)
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get_json(HEALTH_PATH).await
    }
}

fn mime_for(filename: &str) -> &'static str {
    match filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("md" | "markdown") => "text/markdown",
        _ => "application/octet-stream",
    }
}

/// Pull `detail` out of an error body. Validation errors carry a structured
/// detail; those are passed on as compact JSON.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{extract_detail, mime_for};

    #[test]
    fn detail_string_is_extracted() {
        assert_eq!(
            extract_detail(r#"{"detail":"index empty"}"#).as_deref(),
            Some("index empty")
        );
    }

    #[test]
    fn structured_detail_is_flattened_to_json() {
        let detail = extract_detail(r#"{"detail":[{"loc":["body","question"]}]}"#).unwrap();
        assert!(detail.contains("question"));
    }

    #[test]
    fn missing_or_non_json_detail_is_none() {
        assert_eq!(extract_detail("Internal Server Error"), None);
        assert_eq!(extract_detail(r#"{"error":"x"}"#), None);
        assert_eq!(extract_detail(r#"{"detail":null}"#), None);
    }

    #[test]
    fn upload_mime_follows_extension() {
        assert_eq!(mime_for("a.PDF"), "application/pdf");
        assert_eq!(mime_for("notes.markdown"), "text/markdown");
        assert_eq!(mime_for("blob"), "application/octet-stream");
    }
}
