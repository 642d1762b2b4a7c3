use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use base64::Engine;
use log::{debug, error, info, warn};

use crate::error::StorageError;
use crate::resource::{ObjectMeta, PayloadSet};

/// Mode used for directories created on demand, before the umask applies.
const DIRECTORY_MODE: u32 = 0o777;

/// Settings for a [`FileMaterializer`].
#[derive(Debug, Clone)]
pub struct MaterializerOptions {
    /// Default target folder.
    pub folder: PathBuf,
    /// Annotation whose value overrides `folder` for a single resource.
    pub folder_annotation: String,
    /// Permission bits applied to every written file.
    pub file_mode: u32,
    /// Prefix filenames with the resource name to avoid collisions.
    pub unique_filenames: bool,
}

impl MaterializerOptions {
    pub fn new<P: AsRef<Path>>(folder: P) -> Self {
        Self {
            folder: folder.as_ref().to_path_buf(),
            folder_annotation: crate::config::DEFAULT_FOLDER_ANNOTATION.to_string(),
            file_mode: crate::config::DEFAULT_FILE_MODE,
            unique_filenames: false,
        }
    }
}

/// Projects resource payloads onto the filesystem.
///
/// The filesystem is the only state: a write happens only when the bytes on
/// disk differ from the payload. Every mutation runs under one lock, so two
/// events touching the same path are strictly ordered.
pub struct FileMaterializer {
    options: MaterializerOptions,
    fs_lock: Mutex<()>,
}

impl FileMaterializer {
    pub fn new(options: MaterializerOptions) -> Self {
        Self {
            options,
            fs_lock: Mutex::new(()),
        }
    }

    pub fn options(&self) -> &MaterializerOptions {
        &self.options
    }

    /// Materializes a newly observed resource. Returns true if any file changed.
    pub fn on_add(&self, meta: &ObjectMeta, payload: &PayloadSet, is_initial_list: bool) -> bool {
        if is_initial_list {
            debug!("Resource {} observed during initial list", meta.qualified_name());
        }
        self.materialize(meta, payload)
    }

    /// Materializes the new state of an updated resource.
    ///
    /// The previous payload is not consulted: changes are computed against
    /// what is actually on disk.
    pub fn on_update(&self, meta: &ObjectMeta, _old: &PayloadSet, new: &PayloadSet) -> bool {
        self.materialize(meta, new)
    }

    /// Removes the files of a deleted resource. Returns true if any file was removed.
    pub fn on_delete(&self, meta: &ObjectMeta, payload: &PayloadSet) -> bool {
        info!("Removing files of {}", meta.qualified_name());
        let mut removed = false;
        for key in payload.keys() {
            let path = self.target_path(meta, key);
            match self.remove_if_present(&path) {
                Ok(true) => {
                    debug!("Deleted {}", path.display());
                    removed = true;
                }
                Ok(false) => {}
                Err(e) => error!("{}", e),
            }
        }
        removed
    }

    /// Computes where `key` of the resource described by `meta` lands on disk.
    pub fn target_path(&self, meta: &ObjectMeta, key: &str) -> PathBuf {
        let folder = meta
            .annotations
            .get(&self.options.folder_annotation)
            .map(PathBuf::from)
            .unwrap_or_else(|| self.options.folder.clone());

        if self.options.unique_filenames {
            folder.join(unique_filename(&meta.name, key))
        } else {
            folder.join(key)
        }
    }

    /// Writes `data` to `path` unless the file already holds exactly those bytes.
    pub fn write_if_changed(&self, path: &Path, data: &[u8]) -> Result<bool, StorageError> {
        let _guard = self.fs_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(dir) = path.parent() {
            ensure_directory(dir)?;
        }

        match fs::read(path) {
            Ok(current) if current == data => return Ok(false),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            // An unreadable file is treated as stale and overwritten.
            Err(e) => warn!(
                "Failed to read previous version of '{}': {}",
                path.display(),
                e
            ),
        }

        self.write_file(path, data)?;
        Ok(true)
    }

    fn materialize(&self, meta: &ObjectMeta, payload: &PayloadSet) -> bool {
        info!("Handling {}", meta.qualified_name());
        let mut changed = false;

        for (key, value) in &payload.text {
            changed |= self.apply(meta, key, value.as_bytes());
        }

        for (key, encoded) in &payload.binary {
            let decoded = match decode_binary(key, encoded) {
                Ok(decoded) => decoded,
                Err(e) => {
                    error!("{}", e);
                    continue;
                }
            };
            changed |= self.apply(meta, key, &decoded);
        }

        changed
    }

    fn apply(&self, meta: &ObjectMeta, key: &str, data: &[u8]) -> bool {
        let path = self.target_path(meta, key);
        match self.write_if_changed(&path, data) {
            Ok(changed) => {
                if changed {
                    debug!("Wrote {}", path.display());
                }
                changed
            }
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }

    fn remove_if_present(&self, path: &Path) -> Result<bool, StorageError> {
        let _guard = self.fs_lock.lock().unwrap_or_else(PoisonError::into_inner);

        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::RemoveFile {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        let map_err = |e: std::io::Error| StorageError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        };

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.options.file_mode);
        }

        let mut file = options.open(path).map_err(map_err)?;
        file.write_all(data).map_err(map_err)?;

        // The open mode only applies on creation and is subject to the umask.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(self.options.file_mode))
                .map_err(map_err)?;
        }

        Ok(())
    }
}

/// Filename used when unique filenames are enabled. The resource name appears
/// twice; downstream consumers match on this exact shape.
pub fn unique_filename(resource_name: &str, key: &str) -> String {
    format!("namespace_{}.resource_{}.{}", resource_name, resource_name, key)
}

fn decode_binary(key: &str, encoded: &str) -> Result<Vec<u8>, StorageError> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| StorageError::Decode {
            key: key.to_string(),
            source: e,
        })
}

fn ensure_directory(path: &Path) -> Result<(), StorageError> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }

    match fs::metadata(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let mut builder = fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::DirBuilderExt;
                builder.mode(DIRECTORY_MODE);
            }
            builder
                .create(path)
                .map_err(|e| StorageError::CreateDirectory {
                    path: path.to_path_buf(),
                    source: e,
                })
        }
        Err(e) => Err(StorageError::StatDirectory {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
