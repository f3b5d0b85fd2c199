use std::fs;
use std::path::Path;

use dashboard_core::QueryParams;
use dashboard_logging::{rag_info, rag_warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SETTINGS_FILENAME: &str = "rag_dashboard.ron";

/// Optional settings file. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Origin the dashboard is served from; used as the API base when no
    /// override is given.
    pub origin: Option<String>,
    /// Generation model requested from the backend.
    pub model_id: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub top_k: Option<u32>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl DashboardSettings {
    /// Query parameters with unset fields taken from the defaults.
    pub fn query_params(&self) -> QueryParams {
        let defaults = QueryParams::default();
        QueryParams {
            top_k: self.top_k.unwrap_or(defaults.top_k),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings from {path}: {source}")]
    Parse {
        path: String,
        source: ron::error::SpannedError,
    },
}

/// Read the settings file. A missing file yields `Ok(None)`.
pub(crate) fn read_settings(path: &Path) -> Result<Option<DashboardSettings>, SettingsError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
}

/// Like [`read_settings`], but falls back to defaults and logs why.
pub(crate) fn load_settings(path: &Path) -> DashboardSettings {
    match read_settings(path) {
        Ok(Some(settings)) => {
            rag_info!("Loaded settings from {:?}", path);
            settings
        }
        Ok(None) => DashboardSettings::default(),
        Err(err) => {
            rag_warn!("{}", err);
            DashboardSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_SETTINGS_FILENAME);
        assert!(read_settings(&path).unwrap().is_none());
        assert_eq!(load_settings(&path), DashboardSettings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_SETTINGS_FILENAME);
        fs::write(
            &path,
            r#"(origin: Some("https://rag.example"), poll_interval_secs: Some(5))"#,
        )
        .unwrap();

        let settings = read_settings(&path).unwrap().unwrap();
        assert_eq!(settings.origin.as_deref(), Some("https://rag.example"));
        assert_eq!(settings.poll_interval_secs, Some(5));
        assert_eq!(settings.model_id, None);
    }

    #[test]
    fn malformed_file_is_reported_and_ignored() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_SETTINGS_FILENAME);
        fs::write(&path, "(origin: ").unwrap();

        assert!(matches!(
            read_settings(&path),
            Err(SettingsError::Parse { .. })
        ));
        assert_eq!(load_settings(&path), DashboardSettings::default());
    }

    #[test]
    fn query_params_override_only_what_is_set() {
        let settings: DashboardSettings =
            ron::from_str("(top_k: Some(8), temperature: Some(0.25))").unwrap();
        let params = settings.query_params();
        assert_eq!(params.top_k, 8);
        assert_eq!(params.max_tokens, QueryParams::default().max_tokens);
        assert_eq!(params.temperature, 0.25);
        assert_eq!(
            DashboardSettings::default().query_params(),
            QueryParams::default()
        );
    }
}
