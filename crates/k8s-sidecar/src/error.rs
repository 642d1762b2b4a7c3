use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SidecarError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Callback error: {0}")]
    Notify(#[from] NotifyError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings: {0}")]
    Source(#[from] ::config::ConfigError),

    #[error("Required setting '{0}' is not set")]
    Missing(&'static str),

    #[error("Invalid file mode '{value}': {reason}")]
    InvalidFileMode { value: String, reason: String },

    #[error("Invalid value for '{name}': {value}")]
    InvalidNumber { name: &'static str, value: f64 },
}

/// Per-key failures while materializing a payload. These are logged and
/// never escape the event handling entry points.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to verify existence of directory '{path}': {source}")]
    StatDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete file '{path}': {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode base64 value of key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: base64::DecodeError,
    },
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Invalid retry backoff factor {0}, expected a finite value >= 1")]
    InvalidBackoffFactor(f64),

    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("Failed to build request for '{url}': {source}")]
    InvalidRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to init log tracer: {0}")]
    InitLogTracer(#[from] tracing_log::log_tracer::SetLoggerError),

    #[error("Failed to set global default subscriber: {0}")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub type Result<T> = std::result::Result<T, SidecarError>;
