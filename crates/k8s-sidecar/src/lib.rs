//! Projects Kubernetes ConfigMaps and Secrets into a folder and calls a
//! webhook whenever the projected files change.

pub mod callback;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod resource;
pub mod sidecar;
pub mod storage;

pub use callback::{DispatchOutcome, Notifier, NotifierCallback};
pub use crate::config::{
    load_config_from_env, load_config_from_vars, CallbackConfig, SidecarConfig,
};
pub use error::{ConfigError, NotifyError, Result, SidecarError, StorageError};
pub use handlers::{ChangeCallback, ChangeSink, ConfigMapHandler, ResourceEventHandler, SecretHandler};
pub use resource::{ConfigMap, ObjectMeta, PayloadSet, Resource, ResourceKind, Secret};
pub use sidecar::Sidecar;
pub use storage::{FileMaterializer, MaterializerOptions};
