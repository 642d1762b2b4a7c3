use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::resource::ResourceKind;

pub const DEFAULT_FOLDER_ANNOTATION: &str = "k8s-sidecar-target-directory";
pub const DEFAULT_FILE_MODE: u32 = 0o755;
pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_RETRY_BACKOFF_FACTOR: f64 = 1.1;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct SidecarConfig {
    pub folder: PathBuf,
    pub folder_annotation: String,
    pub default_file_mode: u32,
    pub unique_filenames: bool,
    pub resource: ResourceSelection,
    pub callback: CallbackConfig,
    pub log_format: LogFormat,
}

impl SidecarConfig {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            folder_annotation: DEFAULT_FOLDER_ANNOTATION.to_string(),
            default_file_mode: DEFAULT_FILE_MODE,
            unique_filenames: false,
            resource: ResourceSelection::default(),
            callback: CallbackConfig::default(),
            log_format: LogFormat::default(),
        }
    }
}

/// Settings of the change webhook. An empty `url` disables it.
#[derive(Debug)]
pub struct CallbackConfig {
    pub url: String,
    pub method: String,
    pub payload: Option<Vec<u8>>,
    pub retry_backoff_factor: f64,
    /// Per-request client timeout.
    pub timeout: Duration,
    pub username: String,
    pub password: Option<SecretString>,
    /// Disables certificate validation. Insecure; never on by default.
    pub skip_tls_verify: bool,
}

impl CallbackConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.url.is_empty()
    }
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: DEFAULT_METHOD.to_string(),
            payload: None,
            retry_backoff_factor: DEFAULT_RETRY_BACKOFF_FACTOR,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            username: String::new(),
            password: None,
            skip_tls_verify: false,
        }
    }
}

/// Which resource kinds get an adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceSelection {
    #[default]
    ConfigMap,
    Secrets,
    Both,
}

impl ResourceSelection {
    pub fn includes(&self, kind: ResourceKind) -> bool {
        matches!(
            (self, kind),
            (ResourceSelection::Both, _)
                | (ResourceSelection::ConfigMap, ResourceKind::ConfigMap)
                | (ResourceSelection::Secrets, ResourceKind::Secret)
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_selection_includes() {
        assert!(ResourceSelection::ConfigMap.includes(ResourceKind::ConfigMap));
        assert!(!ResourceSelection::ConfigMap.includes(ResourceKind::Secret));
        assert!(ResourceSelection::Secrets.includes(ResourceKind::Secret));
        assert!(!ResourceSelection::Secrets.includes(ResourceKind::ConfigMap));
        assert!(ResourceSelection::Both.includes(ResourceKind::ConfigMap));
        assert!(ResourceSelection::Both.includes(ResourceKind::Secret));
    }

    #[test]
    fn test_resource_selection_serde() {
        let selection: ResourceSelection = serde_json::from_str("\"both\"").unwrap();
        assert_eq!(selection, ResourceSelection::Both);
        assert!(serde_json::from_str::<ResourceSelection>("\"deployments\"").is_err());
    }

    #[test]
    fn test_callback_defaults() {
        let callback = CallbackConfig::default();
        assert!(!callback.is_enabled());
        assert_eq!(callback.method, "GET");
        assert_eq!(callback.retry_backoff_factor, 1.1);
        assert_eq!(callback.timeout, Duration::from_secs(10));
        assert!(!callback.skip_tls_verify);
    }

    #[test]
    fn test_log_format_serde() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
    }
}
