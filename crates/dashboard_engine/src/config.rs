use std::time::Duration;

use dashboard_logging::rag_warn;
use url::Url;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Used when no other source yields a base URL; the client runs degraded.
pub const FALLBACK_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Generation model override sent with every generate request.
    pub model_id: Option<String>,
}

impl ApiSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            model_id: None,
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self::new(fallback_base_url())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BaseUrlError {
    #[error("base url is empty")]
    Empty,
    #[error("invalid base url '{value}': {reason}")]
    Invalid { value: String, reason: String },
    #[error("unsupported scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
}

/// Candidate base URLs, highest priority first.
#[derive(Debug, Clone, Default)]
pub struct BaseUrlSources {
    /// Baked in at compile time.
    pub build_time: Option<String>,
    /// Injected at startup (flag or environment).
    pub runtime: Option<String>,
    /// Origin the dashboard itself is served from.
    pub served_origin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrlSource {
    BuildTime,
    Runtime,
    ServedOrigin,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBaseUrl {
    pub url: Url,
    pub source: BaseUrlSource,
}

impl ResolvedBaseUrl {
    pub fn is_degraded(&self) -> bool {
        self.source == BaseUrlSource::Fallback
    }
}

/// Resolve the API base URL once: build-time override -> runtime override ->
/// served origin -> localhost fallback. Unusable candidates are skipped.
pub fn resolve_base_url(sources: &BaseUrlSources) -> ResolvedBaseUrl {
    let candidates = [
        (sources.build_time.as_deref(), BaseUrlSource::BuildTime),
        (sources.runtime.as_deref(), BaseUrlSource::Runtime),
        (sources.served_origin.as_deref(), BaseUrlSource::ServedOrigin),
    ];
    for (raw, source) in candidates {
        let Some(raw) = raw else { continue };
        match parse_base_url(raw) {
            Ok(url) => return ResolvedBaseUrl { url, source },
            Err(BaseUrlError::Empty) => {}
            Err(err) => rag_warn!("Ignoring {:?} base url: {}", source, err),
        }
    }
    rag_warn!(
        "No API base url configured, falling back to {}",
        FALLBACK_BASE_URL
    );
    ResolvedBaseUrl {
        url: fallback_base_url(),
        source: BaseUrlSource::Fallback,
    }
}

/// Parse and normalise a base URL so that relative endpoint paths join under it.
pub fn parse_base_url(raw: &str) -> Result<Url, BaseUrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BaseUrlError::Empty);
    }
    let mut url = Url::parse(trimmed).map_err(|err| BaseUrlError::Invalid {
        value: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BaseUrlError::UnsupportedScheme(url.scheme().to_string()));
    }
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn fallback_base_url() -> Url {
    Url::parse(FALLBACK_BASE_URL).expect("fallback base url is valid")
}
