//! Wiring of the adapters, the shared materializer and the notifier.

use std::sync::Arc;

use log::info;
use tokio::runtime::Handle;

use crate::callback::{Notifier, NotifierCallback};
use crate::config::{load_config_from_env, SidecarConfig};
use crate::error::{Result, StorageError};
use crate::handlers::{ChangeCallback, ChangeSink, ConfigMapHandler, SecretHandler};
use crate::resource::ResourceKind;
use crate::storage::{FileMaterializer, MaterializerOptions};

/// Mode of the target folder when the sidecar creates it at startup.
const TARGET_FOLDER_MODE: u32 = 0o755;

/// Everything an event source needs: one adapter per selected resource kind,
/// all feeding the same materializer and notifier.
pub struct Sidecar {
    materializer: Arc<FileMaterializer>,
    notifier: Arc<Notifier>,
    configmaps: Option<ConfigMapHandler>,
    secrets: Option<SecretHandler>,
}

impl Sidecar {
    /// Builds the sidecar. Notifications are spawned onto `runtime`.
    pub fn new(config: SidecarConfig, runtime: Handle) -> Result<Self> {
        create_target_folder(&config)?;

        let resource = config.resource;
        let materializer = Arc::new(FileMaterializer::new(MaterializerOptions {
            folder: config.folder,
            folder_annotation: config.folder_annotation,
            file_mode: config.default_file_mode,
            unique_filenames: config.unique_filenames,
        }));
        let notifier = Arc::new(Notifier::new(config.callback)?);
        let callback: Arc<dyn ChangeCallback> =
            Arc::new(NotifierCallback::new(Arc::clone(&notifier), runtime));
        let sink = ChangeSink::new(Arc::clone(&materializer), callback);

        let configmaps = resource
            .includes(ResourceKind::ConfigMap)
            .then(|| ConfigMapHandler::new(sink.clone()));
        let secrets = resource
            .includes(ResourceKind::Secret)
            .then(|| SecretHandler::new(sink));

        info!(
            "Materializing {:?} into {} (callback {})",
            resource,
            materializer.options().folder.display(),
            if notifier.is_enabled() { "enabled" } else { "disabled" }
        );

        Ok(Self {
            materializer,
            notifier,
            configmaps,
            secrets,
        })
    }

    /// Loads the configuration from the environment and builds the sidecar.
    pub fn from_env(runtime: Handle) -> Result<Self> {
        Self::new(load_config_from_env()?, runtime)
    }

    pub fn configmap_handler(&self) -> Option<&ConfigMapHandler> {
        self.configmaps.as_ref()
    }

    pub fn secret_handler(&self) -> Option<&SecretHandler> {
        self.secrets.as_ref()
    }

    pub fn materializer(&self) -> &Arc<FileMaterializer> {
        &self.materializer
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }
}

fn create_target_folder(config: &SidecarConfig) -> std::result::Result<(), StorageError> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(TARGET_FOLDER_MODE);
    }
    builder
        .create(&config.folder)
        .map_err(|e| StorageError::CreateDirectory {
            path: config.folder.clone(),
            source: e,
        })
}
