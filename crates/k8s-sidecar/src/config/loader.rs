use std::path::PathBuf;
use std::time::Duration;

use ::config::{Config, Environment, Map};
use secrecy::SecretString;
use serde::Deserialize;

use crate::config::schema::{
    CallbackConfig, LogFormat, ResourceSelection, SidecarConfig, DEFAULT_FILE_MODE,
    DEFAULT_FOLDER_ANNOTATION,
};
use crate::error::ConfigError;

/// Flat settings exactly as they appear in the environment.
#[derive(Deserialize)]
struct EnvSettings {
    folder: Option<String>,
    folder_annotation: Option<String>,
    default_file_mode: Option<String>,
    #[serde(default)]
    unique_filenames: bool,
    #[serde(default)]
    resource: ResourceSelection,
    #[serde(default)]
    log_format: LogFormat,
    #[serde(default)]
    req_url: String,
    req_method: Option<String>,
    req_payload: Option<String>,
    req_retry_backoff_factor: Option<f64>,
    req_timeout: Option<f64>,
    #[serde(default)]
    req_username: String,
    req_password: Option<String>,
    #[serde(default)]
    req_skip_tls_verify: bool,
}

/// Reads the configuration from the process environment.
pub fn load_config_from_env() -> Result<SidecarConfig, ConfigError> {
    load_config(Environment::default())
}

/// Builds the configuration from an explicit set of variables instead of the
/// process environment.
pub fn load_config_from_vars<I, K, V>(vars: I) -> Result<SidecarConfig, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let vars: Map<String, String> = vars
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect();
    load_config(Environment::default().source(Some(vars)))
}

fn load_config(source: Environment) -> Result<SidecarConfig, ConfigError> {
    // Empty values count as unset.
    let settings = Config::builder()
        .add_source(source.ignore_empty(true))
        .build()?
        .try_deserialize::<EnvSettings>()?;

    settings.validate()
}

impl EnvSettings {
    fn validate(self) -> Result<SidecarConfig, ConfigError> {
        let folder = self
            .folder
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("FOLDER"))?;

        let default_file_mode = match self.default_file_mode {
            Some(value) => parse_file_mode(&value)?,
            None => DEFAULT_FILE_MODE,
        };

        let defaults = CallbackConfig::default();
        let callback = CallbackConfig {
            url: self.req_url,
            method: self
                .req_method
                .map(|m| m.to_uppercase())
                .unwrap_or(defaults.method),
            payload: self.req_payload.map(String::into_bytes),
            retry_backoff_factor: match self.req_retry_backoff_factor {
                Some(factor) => check_backoff_factor(factor)?,
                None => defaults.retry_backoff_factor,
            },
            timeout: match self.req_timeout {
                Some(secs) => seconds("REQ_TIMEOUT", secs)?,
                None => defaults.timeout,
            },
            username: self.req_username,
            password: self.req_password.map(SecretString::from),
            skip_tls_verify: self.req_skip_tls_verify,
        };

        Ok(SidecarConfig {
            folder,
            folder_annotation: self
                .folder_annotation
                .unwrap_or_else(|| DEFAULT_FOLDER_ANNOTATION.to_string()),
            default_file_mode,
            unique_filenames: self.unique_filenames,
            resource: self.resource,
            callback,
            log_format: self.log_format,
        })
    }
}

/// Parses an octal permission string such as `0755` or `0o644`.
pub fn parse_file_mode(value: &str) -> Result<u32, ConfigError> {
    let digits = value.trim();
    let digits = digits.strip_prefix("0o").unwrap_or(digits);

    let mode = u32::from_str_radix(digits, 8).map_err(|e| ConfigError::InvalidFileMode {
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    if mode > 0o7777 {
        return Err(ConfigError::InvalidFileMode {
            value: value.to_string(),
            reason: "mode exceeds 0o7777".to_string(),
        });
    }

    Ok(mode)
}

fn check_backoff_factor(factor: f64) -> Result<f64, ConfigError> {
    if factor.is_finite() && factor >= 1.0 {
        Ok(factor)
    } else {
        Err(ConfigError::InvalidNumber {
            name: "REQ_RETRY_BACKOFF_FACTOR",
            value: factor,
        })
    }
}

fn seconds(name: &'static str, secs: f64) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidNumber { name, value: secs };
    if secs <= 0.0 {
        return Err(invalid());
    }
    Duration::try_from_secs_f64(secs).map_err(|_| invalid())
}
